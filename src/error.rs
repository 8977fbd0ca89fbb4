//! Error types for Rollcall operations

use thiserror::Error;

/// Main error type for Rollcall operations
///
/// Backend call failures are not errors in this sense: they are carried as
/// values in [`crate::backend::ToolOutcome`] so the dispatch loop can relay
/// them to the model. This enum covers everything that happens outside a
/// tool invocation: configuration, the model connection, serialization, IO.
#[derive(Error, Debug)]
pub enum RollcallError {
    /// Configuration error (missing or malformed injected settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Model connection refused our credentials
    #[error("Model authentication failed: {0}")]
    ModelAuth(String),

    /// Model connection rate limited the request
    #[error("Model rate limited: {0}")]
    ModelRateLimit(String),

    /// Model connection rejected the request
    #[error("Model rejected request: {0}")]
    ModelRequest(String),

    /// Model connection returned an API-level error
    #[error("Model API error: {0}")]
    Model(String),

    /// Network failure talking to the model connection
    #[error("Network error: {0}")]
    Network(String),

    /// Model reply could not be parsed
    #[error("Malformed model reply: {0}")]
    MalformedReply(String),

    /// A date string did not parse under the expected format
    #[error("Invalid date '{0}': expected format {1}")]
    InvalidDate(String, String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for RollcallError {
    fn from(err: serde_json::Error) -> Self {
        RollcallError::Serialization(err.to_string())
    }
}

/// Result type alias for Rollcall operations
pub type RollcallResult<T> = Result<T, RollcallError>;
