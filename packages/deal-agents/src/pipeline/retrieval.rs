//! Similarity retrieval over the priced-item corpus.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::traits::{encoder::Encoder, store::VectorStore};
use crate::types::item::{numeric_price, NeighborPrice, SimilaritySet};

/// Metadata key the corpus normally stores prices under.
pub const PRICE_KEY: &str = "price";

/// Older corpus entries store the price here instead.
pub const FALLBACK_PRICE_KEY: &str = "selling_price";

/// Finds historical items similar to a description.
///
/// Encodes with the shared encoder and queries the store once. Store
/// failures propagate; there are no retries.
#[derive(Clone)]
pub struct SimilarityRetriever {
    encoder: Arc<dyn Encoder>,
    store: Arc<dyn VectorStore>,
}

impl SimilarityRetriever {
    pub fn new(encoder: Arc<dyn Encoder>, store: Arc<dyn VectorStore>) -> Self {
        Self { encoder, store }
    }

    /// Return up to `k` neighbors of `description`, most similar first.
    pub async fn find_similar(&self, description: &str, k: usize) -> Result<SimilaritySet> {
        info!(k, "Performing RAG search for similar products");

        let vector = self.encoder.encode(description).await?;
        let mut matches = self.store.query(&vector, k).await?;
        matches.truncate(k);

        let mut set = SimilaritySet::new();
        for m in matches {
            let price = extract_neighbor_price(&m.metadata);
            match price {
                NeighborPrice::Primary(_) => {}
                NeighborPrice::Fallback(value) => {
                    warn!(
                        key = FALLBACK_PRICE_KEY,
                        value, "Neighbor price read from fallback metadata key"
                    );
                }
                NeighborPrice::Missing => {
                    warn!(
                        keys = ?m.metadata.keys().collect::<Vec<_>>(),
                        "Neighbor has no price metadata, using 0.0"
                    );
                }
            }
            set.push(m.document, price);
        }

        debug!(
            found = set.len(),
            missing_prices = set.missing_price_count(),
            "Found similar products"
        );
        Ok(set)
    }
}

/// Read a neighbor's price from store metadata.
///
/// Tries `price`, then `selling_price`. Numbers and numeric strings are
/// accepted; anything else counts as absent.
pub fn extract_neighbor_price(metadata: &Map<String, Value>) -> NeighborPrice {
    if let Some(value) = metadata.get(PRICE_KEY).and_then(numeric_price) {
        return NeighborPrice::Primary(value);
    }
    if let Some(value) = metadata.get(FALLBACK_PRICE_KEY).and_then(numeric_price) {
        return NeighborPrice::Fallback(value);
    }
    NeighborPrice::Missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_primary_key_wins() {
        let price = extract_neighbor_price(&metadata(json!({"price": 12.5, "selling_price": 99})));
        assert_eq!(price, NeighborPrice::Primary(12.5));
    }

    #[test]
    fn test_fallback_key() {
        let price = extract_neighbor_price(&metadata(json!({"selling_price": 30})));
        assert_eq!(price, NeighborPrice::Fallback(30.0));
    }

    #[test]
    fn test_null_primary_uses_fallback() {
        let price = extract_neighbor_price(&metadata(json!({"price": null, "selling_price": "8.75"})));
        assert_eq!(price, NeighborPrice::Fallback(8.75));
    }

    #[test]
    fn test_missing_price_defaults_to_zero() {
        let price = extract_neighbor_price(&metadata(json!({"category": "Appliances"})));
        assert_eq!(price, NeighborPrice::Missing);
        assert_eq!(price.value(), 0.0);
    }
}
