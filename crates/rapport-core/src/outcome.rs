//! Outcome type crossing the facade boundary.

use rapport_model::{FallbackFailure, FallbackResult, FallbackStrategy};

/// Result of parsing one model response.
///
/// Nothing here panics or propagates an error; an undecodable response
/// comes back as `Recovered` (a degraded value tagged with how it was
/// obtained and how much to trust it) or, with every strategy
/// exhausted, as `Failed`.
#[derive(Debug)]
pub enum ParseOutcome<T> {
    /// The cleaned (and possibly field-mapped) text decoded directly.
    Parsed(T),
    /// A fallback strategy produced a usable value.
    Recovered {
        value: T,
        strategy: FallbackStrategy,
        confidence: f32,
    },
    /// Every fallback strategy was exhausted.
    Failed(FallbackFailure),
}

impl<T> ParseOutcome<T> {
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Parsed(value) | Self::Recovered { value, .. } => Some(value),
            Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Parsed(value) | Self::Recovered { value, .. } => Some(value),
            Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed(_))
    }

    #[must_use]
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered { .. })
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The strategy behind a recovered value.
    #[must_use]
    pub fn strategy(&self) -> Option<FallbackStrategy> {
        match self {
            Self::Recovered { strategy, .. } => Some(*strategy),
            _ => None,
        }
    }

    /// Recovery confidence; `None` for direct parses and failures.
    #[must_use]
    pub fn confidence(&self) -> Option<f32> {
        match self {
            Self::Recovered { confidence, .. } => Some(*confidence),
            _ => None,
        }
    }
}

impl<T> From<FallbackResult<T>> for ParseOutcome<T> {
    fn from(result: FallbackResult<T>) -> Self {
        match result {
            FallbackResult::Success {
                value,
                strategy,
                confidence,
            } => Self::Recovered {
                value,
                strategy,
                confidence,
            },
            FallbackResult::Failure(failure) => Self::Failed(failure),
        }
    }
}
