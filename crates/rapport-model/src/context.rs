//! Option bundles for the parsing pipeline stages.
//!
//! Every stage takes its own small context so callers can tune one stage
//! without knowing about the others. Contexts are plain values: build one,
//! adjust it with the `with_*` methods, hand it in by reference.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The AI operation a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Analysis of a received conversation message.
    MessageAnalysis,
    /// Safety check of an outbound message.
    SafetyCheck,
    /// Fact extraction over a conversation window.
    FactExtraction,
    /// Anything else.
    #[default]
    Generic,
}

impl OperationKind {
    /// Stable lowercase tag used in logs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MessageAnalysis => "message_analysis",
            Self::SafetyCheck => "safety_check",
            Self::FactExtraction => "fact_extraction",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call context handed to the parsing facade.
///
/// Identifies the operation for diagnostics. The property bag is carried
/// into logs verbatim and never affects parsing behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsingContext {
    /// Correlation id for this call (request id, message id).
    pub operation_id: String,
    /// Name of the model that produced the response.
    pub model: String,
    /// What the response is supposed to contain.
    pub operation: OperationKind,
    /// Emit stage-by-stage detail to the logs.
    pub verbose: bool,
    /// Free-form diagnostic properties.
    pub properties: BTreeMap<String, String>,
}

impl ParsingContext {
    #[must_use]
    pub fn new(
        operation_id: impl Into<String>,
        model: impl Into<String>,
        operation: OperationKind,
    ) -> Self {
        Self {
            operation_id: operation_id.into(),
            model: model.into(),
            operation,
            verbose: false,
            properties: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_verbose(mut self, enable: bool) -> Self {
        self.verbose = enable;
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Look up a diagnostic property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Options for the Cleaner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CleaningContext {
    /// Decode safe `\uXXXX` escape sequences. Default: true.
    pub fix_unicode_escapes: bool,
    /// Insert commas missing between adjacent object members. Default: true.
    pub fix_structure: bool,
    /// Aggressive last-resort repair (brace rebalancing, slicing).
    /// Default: false.
    pub fuzzy_repair: bool,
    /// Emit stage-by-stage detail to the logs.
    pub verbose: bool,
}

impl Default for CleaningContext {
    fn default() -> Self {
        Self {
            fix_unicode_escapes: true,
            fix_structure: true,
            fuzzy_repair: false,
            verbose: false,
        }
    }
}

impl CleaningContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unicode_fix(mut self, enable: bool) -> Self {
        self.fix_unicode_escapes = enable;
        self
    }

    #[must_use]
    pub fn with_structure_fix(mut self, enable: bool) -> Self {
        self.fix_structure = enable;
        self
    }

    #[must_use]
    pub fn with_fuzzy_repair(mut self, enable: bool) -> Self {
        self.fuzzy_repair = enable;
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, enable: bool) -> Self {
        self.verbose = enable;
        self
    }
}

/// Options for the Field Mapper.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MappingContext {
    /// Rewrite keys that are only similar to a registered alternate.
    /// Default: false (exact matches only).
    pub fuzzy_matching: bool,
    /// Minimum similarity for a fuzzy rewrite, in `[0, 1]`. Default: 0.8.
    pub fuzzy_threshold: f64,
    /// Emit per-key rewrite detail to the logs.
    pub verbose: bool,
}

impl Default for MappingContext {
    fn default() -> Self {
        Self {
            fuzzy_matching: false,
            fuzzy_threshold: 0.8,
            verbose: false,
        }
    }
}

impl MappingContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fuzzy_matching(mut self, enable: bool) -> Self {
        self.fuzzy_matching = enable;
        self
    }

    /// Set the fuzzy threshold, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, enable: bool) -> Self {
        self.verbose = enable;
        self
    }
}

/// Context handed to the Fallback Handler when decoding has failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackContext {
    /// The original raw response text, before any cleaning.
    pub raw: String,
    /// What the response was supposed to contain.
    pub operation: OperationKind,
    /// Name of the model that produced the response.
    pub model: String,
    /// Permit heuristic synthesis of missing mandatory fields.
    /// Default: true.
    pub allow_inference: bool,
    /// Emit rung-by-rung detail to the logs.
    pub verbose: bool,
}

impl FallbackContext {
    #[must_use]
    pub fn new(raw: impl Into<String>, operation: OperationKind, model: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            operation,
            model: model.into(),
            allow_inference: true,
            verbose: false,
        }
    }

    #[must_use]
    pub fn with_inference(mut self, enable: bool) -> Self {
        self.allow_inference = enable;
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, enable: bool) -> Self {
        self.verbose = enable;
        self
    }
}
