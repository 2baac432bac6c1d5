use thiserror::Error;

/// Errors produced by the decode steps of the parsing pipeline.
///
/// The Cleaner and the Field Mapper are total and never fail; only turning
/// cleaned text into typed values can. The Fallback Handler is the sole
/// consumer of these errors.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No decodable JSON object survived cleaning and field mapping.
    #[error("no decodable JSON object in response: {message}")]
    Structural {
        /// What the structural decode reported.
        message: String,
    },

    /// The response decoded as JSON but did not fit the target type.
    #[error("response did not decode as {target}: {source}")]
    Decode {
        /// Target type tag (`ParseTarget::NAME`).
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Mandatory fields were still absent after field mapping.
    #[error("mandatory fields missing for {target}: {}", missing.join(", "))]
    MissingFields {
        /// Target type tag (`ParseTarget::NAME`).
        target: &'static str,
        /// Canonical names of the absent fields.
        missing: Vec<&'static str>,
    },
}

pub type Result<T> = std::result::Result<T, ParseError>;
