//! Result types shared between command execution and summary rendering.

use rapport_model::{FallbackStrategy, OperationKind, ParseError};
use serde_json::Value;

/// Outcome of one `parse` run, shaped for rendering.
pub struct ParseReport {
    /// Target type tag (for example `AnalysisResult`).
    pub target: &'static str,
    /// Operation the reply was parsed for.
    pub operation: OperationKind,
    /// Model named on the command line.
    pub model: String,
    /// How the value was obtained.
    pub status: ParseStatus,
    /// The decoded value; absent when every strategy failed.
    pub value: Option<Value>,
}

pub enum ParseStatus {
    /// The cleaned reply decoded directly.
    Parsed,
    /// A fallback strategy produced the value.
    Recovered {
        strategy: FallbackStrategy,
        confidence: f32,
    },
    /// Every fallback strategy was exhausted.
    Failed {
        error: ParseError,
        attempted: Vec<FallbackStrategy>,
    },
}

impl ParseStatus {
    /// Stable lowercase tag used in logs and JSON output.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Parsed => "parsed",
            Self::Recovered { .. } => "recovered",
            Self::Failed { .. } => "failed",
        }
    }
}

impl ParseReport {
    /// Process exit code for this outcome: parsed and recovered replies
    /// exit 0, an exhausted fallback ladder exits 1.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.status {
            ParseStatus::Parsed | ParseStatus::Recovered { .. } => 0,
            ParseStatus::Failed { .. } => 1,
        }
    }
}
