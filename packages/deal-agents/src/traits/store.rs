//! Vector store trait for nearest-neighbor retrieval.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// One neighbor returned by a vector store query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMatch {
    /// Stored document text
    pub document: String,

    /// Metadata attached to the document
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Distance to the query if the store reports one (lower = closer)
    #[serde(default)]
    pub distance: Option<f32>,
}

impl StoreMatch {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            metadata: Map::new(),
            distance: None,
        }
    }

    /// Add a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A store of embedded documents supporting top-k queries.
///
/// Indexing and persistence are the store's own business; the pipelines only
/// read from it.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Return up to `top_k` documents nearest to `embedding`, closest first.
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<StoreMatch>>;
}

/// Cosine similarity between two vectors; 0.0 for mismatched or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
