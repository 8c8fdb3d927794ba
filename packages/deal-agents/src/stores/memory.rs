//! In-memory vector store.

use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::traits::encoder::Encoder;
use crate::traits::store::{cosine_similarity, StoreMatch, VectorStore};
use crate::types::item::PricedItem;

struct Entry {
    document: String,
    metadata: Map<String, Value>,
    embedding: Vec<f32>,
}

/// Brute-force cosine-similarity store held in memory.
///
/// Useful for testing and for corpora small enough to scan per query.
/// Nothing is persisted.
#[derive(Default)]
pub struct MemoryVectorStore {
    entries: RwLock<Vec<Entry>>,
}

impl MemoryVectorStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with arbitrary metadata.
    pub fn insert(&self, document: impl Into<String>, metadata: Map<String, Value>, embedding: Vec<f32>) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Entry {
                document: document.into(),
                metadata,
                embedding,
            });
    }

    /// Add a priced item, storing its price under the `price` key.
    pub fn insert_item(&self, item: &PricedItem, embedding: Vec<f32>) {
        let mut metadata = Map::new();
        metadata.insert("price".to_string(), Value::from(item.price));
        self.insert(item.description.clone(), metadata, embedding);
    }

    /// Embed and add a batch of priced items.
    pub async fn index_items(&self, encoder: &dyn Encoder, items: &[PricedItem]) -> Result<()> {
        for item in items {
            let embedding = encoder.encode(&item.description).await?;
            self.insert_item(item, embedding);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<StoreMatch>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());

        let mut scored: Vec<(f32, &Entry)> = entries
            .iter()
            .map(|entry| (cosine_similarity(embedding, &entry.embedding), entry))
            .collect();

        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(score, entry)| StoreMatch {
                document: entry.document.clone(),
                metadata: entry.metadata.clone(),
                distance: Some(1.0 - score),
            })
            .collect())
    }
}
