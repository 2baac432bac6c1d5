//! Fallback strategy classification and results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// How a degraded result was produced.
///
/// Closed classification tag. Recovery paths added later extend this enum
/// and the handler dispatch; nothing in the pipeline matches on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackStrategy {
    /// Hand-authored degraded default for the target type.
    UseDefaultValues,
    /// Partial decode merged over the degraded default.
    UsePartialData,
    /// A previously cached result was substituted.
    UseCachedData,
    /// The request should be retried against a different model.
    RetryDifferentModel,
    /// The request should be retried in a simplified form.
    SimplifyRequest,
    /// No automatic recovery; the user has to intervene.
    ManualInputRequired,
    /// Missing mandatory fields synthesized from what survived decoding.
    IntelligentInference,
    /// Fields scraped out of unstructured text.
    FieldExtraction,
    /// Several strategies combined.
    CombinedStrategy,
}

impl FallbackStrategy {
    /// Baseline confidence for results produced by this strategy.
    ///
    /// Real partial data outranks inference, which outranks canned
    /// defaults. Strategies that only signal a retry carry no confidence
    /// of their own.
    #[must_use]
    pub fn baseline_confidence(self) -> f32 {
        match self {
            Self::UsePartialData => 0.60,
            Self::UseCachedData => 0.55,
            Self::CombinedStrategy => 0.50,
            Self::IntelligentInference => 0.45,
            Self::FieldExtraction => 0.40,
            Self::UseDefaultValues => 0.30,
            Self::RetryDifferentModel | Self::SimplifyRequest | Self::ManualInputRequired => 0.0,
        }
    }

    /// Human-readable description for logs and reports.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::UseDefaultValues => "hand-authored default values",
            Self::UsePartialData => "partial data merged over defaults",
            Self::UseCachedData => "previously cached result",
            Self::RetryDifferentModel => "retry with a different model",
            Self::SimplifyRequest => "retry with a simplified request",
            Self::ManualInputRequired => "manual input required",
            Self::IntelligentInference => "missing fields inferred from partial data",
            Self::FieldExtraction => "fields extracted from unstructured text",
            Self::CombinedStrategy => "combination of strategies",
        }
    }

    /// Stable snake_case tag (identical to the serde representation).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UseDefaultValues => "use_default_values",
            Self::UsePartialData => "use_partial_data",
            Self::UseCachedData => "use_cached_data",
            Self::RetryDifferentModel => "retry_different_model",
            Self::SimplifyRequest => "simplify_request",
            Self::ManualInputRequired => "manual_input_required",
            Self::IntelligentInference => "intelligent_inference",
            Self::FieldExtraction => "field_extraction",
            Self::CombinedStrategy => "combined_strategy",
        }
    }
}

impl fmt::Display for FallbackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why every fallback strategy was exhausted.
#[derive(Debug)]
pub struct FallbackFailure {
    /// The error that sent the response into fallback handling.
    pub error: ParseError,
    /// Strategies evaluated before giving up, in ladder order.
    pub attempted: Vec<FallbackStrategy>,
}

/// Outcome of fallback handling for a target type `T`.
///
/// `Success` always carries a value and the strategy that produced it;
/// `Failure` never carries a value. Confidence stays in `[0, 1]`.
#[derive(Debug)]
pub enum FallbackResult<T> {
    Success {
        value: T,
        strategy: FallbackStrategy,
        /// How much the consumer should trust the value, in `[0, 1]`.
        confidence: f32,
    },
    Failure(FallbackFailure),
}

impl<T> FallbackResult<T> {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Strategy used, when a value was produced.
    #[must_use]
    pub fn strategy(&self) -> Option<FallbackStrategy> {
        match self {
            Self::Success { strategy, .. } => Some(*strategy),
            Self::Failure(_) => None,
        }
    }

    /// Confidence of the produced value, when there is one.
    #[must_use]
    pub fn confidence(&self) -> Option<f32> {
        match self {
            Self::Success { confidence, .. } => Some(*confidence),
            Self::Failure(_) => None,
        }
    }

    /// Consume the result, keeping the value when one was produced.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_tags_match_serde() {
        for strategy in [
            FallbackStrategy::UseDefaultValues,
            FallbackStrategy::UsePartialData,
            FallbackStrategy::UseCachedData,
            FallbackStrategy::RetryDifferentModel,
            FallbackStrategy::SimplifyRequest,
            FallbackStrategy::ManualInputRequired,
            FallbackStrategy::IntelligentInference,
            FallbackStrategy::FieldExtraction,
            FallbackStrategy::CombinedStrategy,
        ] {
            let json = serde_json::to_string(&strategy).expect("serialize strategy");
            assert_eq!(json, format!("\"{strategy}\""));
        }
    }

    #[test]
    fn confidence_ordering_holds() {
        let partial = FallbackStrategy::UsePartialData.baseline_confidence();
        let inference = FallbackStrategy::IntelligentInference.baseline_confidence();
        let defaults = FallbackStrategy::UseDefaultValues.baseline_confidence();
        assert!(partial > inference && inference > defaults);
        assert!(defaults > 0.0);
    }

    #[test]
    fn result_accessors() {
        let ok: FallbackResult<u32> = FallbackResult::Success {
            value: 7,
            strategy: FallbackStrategy::UsePartialData,
            confidence: 0.6,
        };
        assert!(ok.is_success());
        assert_eq!(ok.strategy(), Some(FallbackStrategy::UsePartialData));
        assert_eq!(ok.into_value(), Some(7));

        let failed: FallbackResult<u32> = FallbackResult::Failure(FallbackFailure {
            error: crate::error::ParseError::Structural {
                message: "not json".to_string(),
            },
            attempted: vec![FallbackStrategy::UsePartialData],
        });
        assert!(!failed.is_success());
        assert_eq!(failed.strategy(), None);
        assert_eq!(failed.into_value(), None);
    }
}
