//! Pure Gemini REST API client
//!
//! A minimal client for Google's generative language API with no
//! domain-specific logic. Supports content generation, JSON-constrained
//! output, and embeddings.
//!
//! # Example
//!
//! ```rust,ignore
//! use gemini_client::{GeminiClient, GenerateRequest};
//!
//! let client = GeminiClient::from_env()?;
//!
//! let response = client
//!     .generate_content(
//!         "gemini-2.5-flash-lite",
//!         GenerateRequest::new("How much does this cost?").temperature(0.0),
//!     )
//!     .await?;
//!
//! let embedding = client.embed_content("text-embedding-004", "text to embed").await?;
//! ```
//!
//! JSON-constrained output takes a schema through
//! [`GenerateRequest::json`]; [`normalize_schema`] reshapes a schemars schema
//! into the form the API accepts.

pub mod error;
pub mod schema;
pub mod types;

pub use error::{GeminiError, Result};
pub use schema::normalize_schema;
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Pure Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `GEMINI_API_KEY`.
    ///
    /// An unset or blank key is a configuration error.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GeminiError::Config(format!("{} not set", API_KEY_ENV)))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies, test servers, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply a whole-request timeout to every call.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeminiError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate content from a request.
    ///
    /// Returns the concatenated text of the first candidate.
    pub async fn generate_content(
        &self,
        model: &str,
        request: GenerateRequest,
    ) -> Result<GenerateResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                GeminiError::Network(e.to_string())
            })?;

        let response = ensure_success(response).await?;

        let raw: types::GenerateResponseRaw = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        let response = first_candidate(raw)?;

        debug!(
            model = %model,
            duration_ms = start.elapsed().as_millis(),
            finish_reason = ?response.finish_reason,
            "Gemini generate content"
        );

        Ok(response)
    }

    /// Create an embedding for text.
    pub async fn embed_content(&self, model: &str, text: &str) -> Result<Vec<f32>> {
        let request = types::EmbedContentRequest {
            content: Content::text(text),
        };

        let response = self
            .http_client
            .post(format!("{}/models/{}:embedContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Embedding request failed");
                GeminiError::Network(e.to_string())
            })?;

        let response = ensure_success(response).await?;

        let embed_response: types::EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Parse(e.to_string()))?;

        Ok(embed_response.embedding.values)
    }
}

/// Turn a non-2xx response into [`GeminiError::Http`].
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    warn!(status = %status, error = %message, "Gemini API error");
    Err(GeminiError::Http {
        status: status.as_u16(),
        message,
    })
}

/// Text of the first candidate, or why there is none.
fn first_candidate(raw: types::GenerateResponseRaw) -> Result<GenerateResponse> {
    if let Some(reason) = raw.prompt_feedback.and_then(|f| f.block_reason) {
        warn!(reason = %reason, "Gemini blocked the prompt");
        return Err(GeminiError::Blocked(reason));
    }

    let candidate = raw
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GeminiError::Api("No candidates from Gemini".into()))?;

    Ok(GenerateResponse {
        text: candidate
            .content
            .map(|c| c.joined_text())
            .unwrap_or_default(),
        finish_reason: candidate.finish_reason,
        usage: raw.usage_metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = GeminiClient::new("test-key").with_base_url("https://proxy.example.com/v1beta/");

        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url(), "https://proxy.example.com/v1beta");
    }

    #[test]
    fn test_default_base_url() {
        let client = GeminiClient::new("test-key");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    fn raw(json: &str) -> types::GenerateResponseRaw {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_block_reason_is_blocked_error() {
        let err = first_candidate(raw(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#))
            .unwrap_err();
        assert!(matches!(err, GeminiError::Blocked(ref r) if r == "SAFETY"), "got {:?}", err);
    }

    #[test]
    fn test_no_candidates_is_api_error() {
        let err = first_candidate(raw(r#"{"candidates": []}"#)).unwrap_err();
        assert!(matches!(err, GeminiError::Api(_)), "got {:?}", err);
    }

    #[test]
    fn test_first_candidate_text() {
        let response = first_candidate(raw(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "42"}]}, "finishReason": "STOP"},
                {"content": {"parts": [{"text": "99"}]}}
            ]}"#,
        ))
        .unwrap();

        assert_eq!(response.text, "42");
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_timeout_keeps_settings() {
        let client = GeminiClient::new("test-key")
            .with_base_url("http://localhost:1234")
            .with_timeout(Duration::from_secs(3))
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = GeminiClient::new("test-key").with_base_url("http://127.0.0.1:9");

        let err = client
            .generate_content("any-model", GenerateRequest::new("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, GeminiError::Network(_)), "got {:?}", err);
    }
}
