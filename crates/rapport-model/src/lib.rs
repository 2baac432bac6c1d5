pub mod context;
pub mod de;
pub mod error;
pub mod fallback;
pub mod results;
pub mod target;

pub use context::{
    CleaningContext, FallbackContext, MappingContext, OperationKind, ParsingContext,
};
pub use error::{ParseError, Result};
pub use fallback::{FallbackFailure, FallbackResult, FallbackStrategy};
pub use results::{AnalysisResult, ExtractedFact, ExtractedFacts, RiskLevel, SafetyCheckResult};
pub use target::{ParseTarget, PartialFields};
