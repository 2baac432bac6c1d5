//! Fallback strategies for responses that refuse to decode.
//!
//! When cleaning and field mapping still leave undecodable text, the
//! handler walks a fixed ladder: salvage the partial object when it
//! covers every mandatory field, infer a value from what did survive,
//! fall back to the type's hand-authored degraded default, and only
//! then report failure. The ladder is deterministic; identical inputs
//! produce identical outcomes.

use rapport_model::{
    FallbackContext, FallbackFailure, FallbackResult, FallbackStrategy, ParseError, ParseTarget,
    PartialFields,
};
use serde_json::Value;
use tracing::{debug, warn};

/// The recovery stage of the parsing pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackHandler;

impl FallbackHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Recover from a response with no decodable object at all.
    pub fn handle_parsing_failure<T: ParseTarget>(
        &self,
        error: ParseError,
        ctx: &FallbackContext,
    ) -> FallbackResult<T> {
        self.resolve(None, error, ctx)
    }

    /// Recover from a response that decoded structurally but not into
    /// the target type. Non-object values carry nothing salvageable and
    /// are treated like a parsing failure.
    pub fn handle_partial_result<T: ParseTarget>(
        &self,
        partial: Value,
        error: ParseError,
        ctx: &FallbackContext,
    ) -> FallbackResult<T> {
        let fields = match partial {
            Value::Object(map) => Some(map),
            _ => None,
        };
        self.resolve(fields, error, ctx)
    }

    /// The degraded default for a target type, when it defines one.
    #[must_use]
    pub fn generate_default_value<T: ParseTarget>(&self) -> Option<T> {
        T::degraded_default()
    }

    /// Walk the strategy ladder. Every rung that cannot produce a value
    /// falls through to the next; order and confidences are fixed.
    fn resolve<T: ParseTarget>(
        &self,
        partial: Option<PartialFields>,
        error: ParseError,
        ctx: &FallbackContext,
    ) -> FallbackResult<T> {
        let mandatory = T::mandatory_fields();
        let covered = partial
            .as_ref()
            .map_or(0, |fields| coverage(fields, mandatory));

        if let Some(fields) = partial.as_ref()
            && covered == mandatory.len()
            && let Some(value) = merge_into_default::<T>(fields)
        {
            return recovered(value, FallbackStrategy::UsePartialData, ctx);
        }

        if ctx.allow_inference
            && covered >= 1
            && let Some(fields) = partial.as_ref()
            && let Some(value) = T::infer_from_partial(fields, ctx)
        {
            return recovered(value, FallbackStrategy::IntelligentInference, ctx);
        }

        if let Some(value) = T::degraded_default() {
            return recovered(value, FallbackStrategy::UseDefaultValues, ctx);
        }

        let attempted = vec![
            FallbackStrategy::UsePartialData,
            FallbackStrategy::IntelligentInference,
            FallbackStrategy::UseDefaultValues,
        ];
        let error = match partial {
            Some(fields) if covered < mandatory.len() => ParseError::MissingFields {
                target: T::NAME,
                missing: mandatory
                    .iter()
                    .filter(|field| !is_covered(&fields, field))
                    .copied()
                    .collect(),
            },
            _ => error,
        };
        warn!(
            target_type = T::NAME,
            operation = %ctx.operation,
            model = %ctx.model,
            error = %error,
            "all fallback strategies exhausted"
        );
        FallbackResult::Failure(FallbackFailure { error, attempted })
    }
}

fn recovered<T: ParseTarget>(
    value: T,
    strategy: FallbackStrategy,
    ctx: &FallbackContext,
) -> FallbackResult<T> {
    let confidence = strategy.baseline_confidence();
    warn!(
        target_type = T::NAME,
        operation = %ctx.operation,
        strategy = %strategy,
        confidence,
        "recovered a degraded result"
    );
    FallbackResult::Success {
        value,
        strategy,
        confidence,
    }
}

/// Number of mandatory fields present with a non-null value.
fn coverage(fields: &PartialFields, mandatory: &[&str]) -> usize {
    mandatory
        .iter()
        .filter(|field| is_covered(fields, field))
        .count()
}

fn is_covered(fields: &PartialFields, field: &str) -> bool {
    fields.get(field).is_some_and(|value| !value.is_null())
}

/// Overlay the partial fields on the type's degraded default (or on an
/// empty object when none exists) and try to decode. Null values are
/// skipped; they never beat a default.
fn merge_into_default<T: ParseTarget>(fields: &PartialFields) -> Option<T> {
    let mut base = match T::degraded_default().map(|default| serde_json::to_value(&default)) {
        Some(Ok(Value::Object(map))) => map,
        _ => PartialFields::new(),
    };
    for (key, value) in fields {
        if !value.is_null() {
            base.insert(key.clone(), value.clone());
        }
    }
    match serde_json::from_value(Value::Object(base)) {
        Ok(value) => Some(value),
        Err(source) => {
            debug!(target_type = T::NAME, error = %source, "partial merge did not decode");
            None
        }
    }
}
