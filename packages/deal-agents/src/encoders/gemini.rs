//! Remote encoder using the Gemini embedding endpoint.

use async_trait::async_trait;
use gemini_client::GeminiClient;

use crate::error::{DealError, Result};
use crate::traits::encoder::Encoder;

pub const DEFAULT_GEMINI_EMBEDDING_MODEL: &str = "text-embedding-004";
pub const DEFAULT_GEMINI_EMBEDDING_DIM: usize = 768;

/// Encoder that calls the model API for every embedding.
#[derive(Clone)]
pub struct GeminiEncoder {
    client: GeminiClient,
    model: String,
    dimension: usize,
}

impl GeminiEncoder {
    /// Use the default embedding model.
    pub fn new(client: GeminiClient) -> Self {
        Self {
            client,
            model: DEFAULT_GEMINI_EMBEDDING_MODEL.to_string(),
            dimension: DEFAULT_GEMINI_EMBEDDING_DIM,
        }
    }

    /// Use another embedding model with its output dimension.
    pub fn with_model(mut self, model: impl Into<String>, dimension: usize) -> Self {
        self.model = model.into();
        self.dimension = dimension;
        self
    }
}

#[async_trait]
impl Encoder for GeminiEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let vector = self.client.embed_content(&self.model, text).await?;
        if vector.len() != self.dimension {
            return Err(DealError::Embedding(format!(
                "{} returned {} values, expected {}",
                self.model,
                vector.len(),
                self.dimension
            )));
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
