//! Typed errors for the deal agents library.
//!
//! Every pipeline returns `Result<T, DealError>`; callers decide whether a
//! failure is fatal or collapses to "nothing this round".

use thiserror::Error;

/// Errors that can occur while estimating prices or curating deals.
#[derive(Debug, Error)]
pub enum DealError {
    /// Missing credential or invalid setting, raised at construction
    #[error("config error: {0}")]
    Config(String),

    /// Vector store query failed
    #[error("retrieval error: {0}")]
    Retrieval(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Encoder failed to produce an embedding
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Transport failure calling the model
    #[error("network error: {0}")]
    Network(String),

    /// Model API returned a non-success response
    #[error("model API error: {0}")]
    Api(String),

    /// Model output was not the expected shape
    #[error("parse error: {0}")]
    Parse(String),

    /// Model output parsed but broke selection rules
    #[error("validation error: {reason}")]
    Validation { reason: String },

    /// Feed collaborator failed to supply candidates
    #[error("feed error: {0}")]
    Feed(String),
}

impl DealError {
    /// Wrap any store-side failure as a retrieval error.
    pub fn retrieval<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Retrieval(err.into())
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DealError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(feature = "gemini")]
impl From<gemini_client::GeminiError> for DealError {
    fn from(err: gemini_client::GeminiError) -> Self {
        use gemini_client::GeminiError;

        match err {
            GeminiError::Config(msg) => Self::Config(msg),
            GeminiError::Network(msg) => Self::Network(msg),
            http @ GeminiError::Http { .. } => Self::Api(http.to_string()),
            blocked @ GeminiError::Blocked(_) => Self::Api(blocked.to_string()),
            GeminiError::Api(msg) => Self::Api(msg),
            GeminiError::Parse(msg) => Self::Parse(msg),
        }
    }
}

/// Result type alias for deal agent operations.
pub type Result<T> = std::result::Result<T, DealError>;
