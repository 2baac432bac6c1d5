//! Response parsing facade.
//!
//! One call per model response, with a fixed internal order:
//!
//! 1. clean the raw text
//! 2. try a direct decode into the target type (success skips the rest)
//! 3. rewrite alternate field names to canonical ones
//! 4. retry the decode
//! 5. decode to a plain value and hand whatever survived to the
//!    fallback handler
//!
//! Callers construct the parser explicitly and own it; there is no
//! global instance. Parsing never panics and never returns a bare
//! error: every response becomes a [`ParseOutcome`].

mod outcome;

pub use outcome::ParseOutcome;

use rapport_clean::Cleaner;
use rapport_fallback::FallbackHandler;
use rapport_map::{FieldMapper, FieldTable};
use rapport_model::{
    AnalysisResult, CleaningContext, ExtractedFacts, FallbackContext, MappingContext, ParseError,
    ParseTarget, ParsingContext, SafetyCheckResult,
};
use tracing::{debug, debug_span};

/// Configurable front door to the parsing pipeline.
#[derive(Debug, Default)]
pub struct ResponseParserBuilder {
    table: Option<FieldTable>,
    cleaning: CleaningContext,
    mapping: MappingContext,
    no_inference: bool,
}

impl ResponseParserBuilder {
    /// Cleaning toggles applied to every parse.
    #[must_use]
    pub fn with_cleaning(mut self, ctx: CleaningContext) -> Self {
        self.cleaning = ctx;
        self
    }

    /// Mapping toggles applied to every parse.
    #[must_use]
    pub fn with_mapping(mut self, ctx: MappingContext) -> Self {
        self.mapping = ctx;
        self
    }

    /// Replace the built-in alternate-name table.
    #[must_use]
    pub fn with_field_table(mut self, table: FieldTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Allow or forbid the intelligent-inference fallback rung.
    /// Enabled by default.
    #[must_use]
    pub fn with_inference(mut self, enable: bool) -> Self {
        self.no_inference = !enable;
        self
    }

    #[must_use]
    pub fn build(self) -> ResponseParser {
        ResponseParser {
            cleaner: Cleaner::new(),
            mapper: self.table.map_or_else(FieldMapper::builtin, FieldMapper::new),
            fallback: FallbackHandler::new(),
            cleaning: self.cleaning,
            mapping: self.mapping,
            allow_inference: !self.no_inference,
        }
    }
}

/// Parses model responses into typed results, recovering what it can
/// from malformed ones.
///
/// Shareable across threads as-is; registering extra mappings needs
/// `&mut self`, so concurrent readers and a writer cannot coexist by
/// construction.
#[derive(Debug)]
pub struct ResponseParser {
    cleaner: Cleaner,
    mapper: FieldMapper,
    fallback: FallbackHandler,
    cleaning: CleaningContext,
    mapping: MappingContext,
    allow_inference: bool,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ResponseParser {
    /// A parser with default toggles and the built-in mapping table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> ResponseParserBuilder {
        ResponseParserBuilder::default()
    }

    /// Parse one raw model response into `T`.
    pub fn parse<T: ParseTarget>(&self, raw: &str, ctx: &ParsingContext) -> ParseOutcome<T> {
        let span = debug_span!(
            "parse",
            target_type = T::NAME,
            operation = %ctx.operation,
            model = %ctx.model,
            id = %ctx.operation_id,
        );
        let _guard = span.entered();

        let cleaning = self.cleaning.with_verbose(self.cleaning.verbose || ctx.verbose);
        let mapping = self.mapping.with_verbose(self.mapping.verbose || ctx.verbose);

        let cleaned = self.cleaner.clean(raw, &cleaning);
        let direct_error = match serde_json::from_str::<T>(&cleaned) {
            Ok(value) => {
                debug!("decoded directly after cleaning");
                return ParseOutcome::Parsed(value);
            }
            Err(error) => error,
        };

        let mapped = self.mapper.map_fields(&cleaned, &mapping);
        let decode_error = if mapped == cleaned {
            direct_error
        } else {
            match serde_json::from_str::<T>(&mapped) {
                Ok(value) => {
                    debug!("decoded after field mapping");
                    return ParseOutcome::Parsed(value);
                }
                Err(error) => error,
            }
        };
        debug!(error = %decode_error, "decode failed, entering fallback");

        let fallback_ctx = FallbackContext::new(raw, ctx.operation, &ctx.model)
            .with_inference(self.allow_inference)
            .with_verbose(ctx.verbose);
        let result = match serde_json::from_str::<serde_json::Value>(&mapped) {
            Ok(partial) => self.fallback.handle_partial_result(
                partial,
                ParseError::Decode {
                    target: T::NAME,
                    source: decode_error,
                },
                &fallback_ctx,
            ),
            Err(error) => self.fallback.handle_parsing_failure(
                ParseError::Structural {
                    message: error.to_string(),
                },
                &fallback_ctx,
            ),
        };
        result.into()
    }

    /// Parse a message-analysis response.
    pub fn parse_analysis(&self, raw: &str, ctx: &ParsingContext) -> ParseOutcome<AnalysisResult> {
        self.parse(raw, ctx)
    }

    /// Parse a safety-check response.
    pub fn parse_safety_check(
        &self,
        raw: &str,
        ctx: &ParsingContext,
    ) -> ParseOutcome<SafetyCheckResult> {
        self.parse(raw, ctx)
    }

    /// Parse a fact-extraction response.
    pub fn parse_extracted_facts(
        &self,
        raw: &str,
        ctx: &ParsingContext,
    ) -> ParseOutcome<ExtractedFacts> {
        self.parse(raw, ctx)
    }

    /// The mapper behind this parser.
    #[must_use]
    pub fn mapper(&self) -> &FieldMapper {
        &self.mapper
    }

    /// Mutable access for registering mappings between parses.
    pub fn mapper_mut(&mut self) -> &mut FieldMapper {
        &mut self.mapper
    }
}
