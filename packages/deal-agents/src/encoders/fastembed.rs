//! Local ONNX encoder backed by the `fastembed` crate.
//!
//! Inference runs without any external service. The session needs exclusive
//! access while it runs, so calls are serialized behind a mutex and
//! dispatched to the blocking pool.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::debug;

use crate::error::{DealError, Result};
use crate::traits::encoder::Encoder;

/// Default model: small e5 checkpoint, 384 dimensions.
pub const DEFAULT_FASTEMBED_MODEL: &str = "multilingual-e5-small";

/// Local embedding encoder.
#[derive(Clone)]
pub struct FastEmbedEncoder {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
}

impl FastEmbedEncoder {
    /// Load the default model.
    pub fn new() -> Result<Self> {
        Self::with_model_name(DEFAULT_FASTEMBED_MODEL)
    }

    /// Load a model by its short name (e.g. `bge-small-en`, `all-minilm-l6-v2`).
    pub fn with_model_name(name: &str) -> Result<Self> {
        let model = parse_embedding_model(name)
            .ok_or_else(|| DealError::Config(format!("unknown embedding model: {}", name)))?;
        Self::load(model, name)
    }

    /// Load a specific fastembed model.
    ///
    /// Blocks while weights are read (and downloaded on first use).
    pub fn load(model: EmbeddingModel, name: &str) -> Result<Self> {
        let options = InitOptions::new(model).with_show_download_progress(false);
        let mut embedding = TextEmbedding::try_new(options).map_err(|e| {
            DealError::Embedding(format!("failed to initialize {}: {}", name, e))
        })?;

        // Probe with the empty string so the dimension comes from the model itself.
        let probe = embedding
            .embed(vec![""], None)
            .map_err(|e| DealError::Embedding(format!("probe embedding failed: {}", e)))?;
        let dimension = probe.first().map(Vec::len).unwrap_or_default();
        debug!(model = %name, dimension, "Loaded fastembed model");

        Ok(Self {
            model: Arc::new(Mutex::new(embedding)),
            model_name: name.to_string(),
            dimension,
        })
    }
}

#[async_trait]
impl Encoder for FastEmbedEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let model = Arc::clone(&self.model);
        let text = text.to_string();

        let mut vectors = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| DealError::Embedding("fastembed model lock poisoned".into()))?;
            model
                .embed(vec![text], None)
                .map_err(|e| DealError::Embedding(format!("fastembed embedding failed: {}", e)))
        })
        .await
        .map_err(|e| DealError::Embedding(format!("fastembed task failed: {}", e)))??;

        vectors
            .pop()
            .ok_or_else(|| DealError::Embedding("fastembed returned no vectors".into()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Map a short model name onto a fastembed model.
pub fn parse_embedding_model(name: &str) -> Option<EmbeddingModel> {
    match name.to_lowercase().as_str() {
        "multilingual-e5-small" | "e5-small" => Some(EmbeddingModel::MultilingualE5Small),
        "multilingual-e5-base" | "e5-base" => Some(EmbeddingModel::MultilingualE5Base),
        "multilingual-e5-large" | "e5-large" => Some(EmbeddingModel::MultilingualE5Large),
        "bge-small-en" => Some(EmbeddingModel::BGESmallENV15),
        "bge-base-en" => Some(EmbeddingModel::BGEBaseENV15),
        "all-minilm-l6-v2" => Some(EmbeddingModel::AllMiniLML6V2),
        _ => None,
    }
}
