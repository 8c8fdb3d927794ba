//! Error types for the Gemini client.

use thiserror::Error;

/// Result type for Gemini client operations.
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Gemini client errors.
///
/// A refused prompt arrives as HTTP 200 with `promptFeedback.blockReason`
/// set, so it is reported as [`GeminiError::Blocked`] rather than folded into
/// the HTTP failures.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Missing API key or an HTTP client that could not be built
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed or timed out before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("Gemini HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The prompt was refused by safety filtering
    #[error("Prompt blocked: {0}")]
    Blocked(String),

    /// Successful response without anything usable in it
    #[error("API error: {0}")]
    Api(String),

    /// Response body did not match the wire format
    #[error("Parse error: {0}")]
    Parse(String),
}
