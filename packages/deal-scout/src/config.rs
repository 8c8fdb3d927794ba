use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;

/// Which encoder embeds descriptions for retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Remote embeddings from the Gemini API
    Gemini,
    /// Local ONNX model (needs the `fastembed` feature)
    FastEmbed,
}

impl EmbeddingBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "fastembed" | "local" => Ok(Self::FastEmbed),
            other => bail!("EMBEDDING_BACKEND must be 'gemini' or 'fastembed', got '{}'", other),
        }
    }
}

fn parse_timeout(value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => bail!("GEMINI_TIMEOUT_SECS must be a positive number of seconds, got '{}'", value),
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: Option<String>,
    /// Whole-request timeout for Gemini calls, in seconds
    pub gemini_timeout_secs: Option<u64>,
    pub chroma_url: String,
    pub chroma_collection_id: Option<String>,
    pub chroma_token: Option<String>,
    pub chroma_tenant: Option<String>,
    pub chroma_database: Option<String>,
    pub embedding_backend: EmbeddingBackend,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let gemini_api_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;
        if gemini_api_key.trim().is_empty() {
            bail!("GEMINI_API_KEY must not be empty");
        }

        Ok(Self {
            gemini_api_key,
            gemini_model: env::var("GEMINI_MODEL").ok().filter(|m| !m.is_empty()),
            gemini_timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .map(|v| parse_timeout(&v))
                .transpose()?,
            chroma_url: env::var("CHROMA_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            chroma_collection_id: env::var("CHROMA_COLLECTION_ID").ok(),
            chroma_token: env::var("CHROMA_TOKEN").ok(),
            chroma_tenant: env::var("CHROMA_TENANT").ok().filter(|t| !t.is_empty()),
            chroma_database: env::var("CHROMA_DATABASE").ok().filter(|d| !d.is_empty()),
            embedding_backend: env::var("EMBEDDING_BACKEND")
                .map(|v| EmbeddingBackend::parse(&v))
                .unwrap_or(Ok(EmbeddingBackend::Gemini))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!(EmbeddingBackend::parse("Gemini").unwrap(), EmbeddingBackend::Gemini);
        assert_eq!(EmbeddingBackend::parse(" fastembed ").unwrap(), EmbeddingBackend::FastEmbed);
        assert!(EmbeddingBackend::parse("openai").is_err());
    }

    #[test]
    fn test_timeout_parse() {
        assert_eq!(parse_timeout(" 30 ").unwrap(), 30);
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }
}
