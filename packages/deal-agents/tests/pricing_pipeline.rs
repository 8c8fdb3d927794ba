//! Integration tests for retrieval-augmented price estimation.
//!
//! These run the full pricing pass against an in-memory corpus:
//! 1. Encode and retrieve neighbors
//! 2. Build the context prompt
//! 3. Call the model once
//! 4. Parse the reply

use std::sync::Arc;

use async_trait::async_trait;
use deal_agents::{
    testing::{HashEncoder, MockModel},
    DealError, Encoder, LazyEncoder, MemoryVectorStore, PriceEstimator, PriceSource, PricedItem,
    PricerConfig, ResponseFormat, SimilarityRetriever, StoreMatch, VectorStore,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

const DIM: usize = 32;

fn corpus() -> Vec<PricedItem> {
    vec![
        PricedItem::new("Stainless steel electric kettle, 1.7L", 34.99),
        PricedItem::new("Cordless drill 18V with two batteries", 89.0),
        PricedItem::new("Bluetooth over-ear headphones", 129.5),
        PricedItem::new("Cast iron skillet 12 inch", 27.25),
        PricedItem::new("LED desk lamp with USB port", 22.0),
        PricedItem::new("Robot vacuum with mapping", 249.99),
        PricedItem::new("Espresso machine, 15 bar", 179.0),
    ]
}

/// Helper to build an estimator over an indexed corpus.
async fn setup_estimator(items: &[PricedItem], model: MockModel) -> PriceEstimator {
    let encoder: Arc<dyn Encoder> = Arc::new(HashEncoder::new(DIM));
    let store = Arc::new(MemoryVectorStore::new());
    store.index_items(encoder.as_ref(), items).await.unwrap();

    PriceEstimator::new(SimilarityRetriever::new(encoder, store), Arc::new(model))
}

#[tokio::test]
async fn test_estimate_price_end_to_end() {
    let model = MockModel::new().with_reply("$1,149.00");
    let estimator = setup_estimator(&corpus(), model.clone()).await;

    let estimate = estimator
        .estimate_price("Espresso machine with milk frother")
        .await
        .unwrap();

    assert_eq!(estimate.value, 1149.0);
    assert_eq!(estimate.source, PriceSource::Parsed);
    assert_eq!(model.call_count(), 1);

    let call = &model.calls()[0];
    assert!(call.prompt.starts_with("To provide some context"));
    assert!(call
        .prompt
        .ends_with("How much does this cost?\n\nEspresso machine with milk frother\n\nPrice is $"));
    assert_eq!(call.prompt.matches("Potentially related product:").count(), 5);

    assert_eq!(call.options.temperature, 0.0);
    assert_eq!(call.options.max_output_tokens, Some(5));
    assert_eq!(call.options.response_format, ResponseFormat::Text);
    assert_eq!(
        call.options.system_instruction.as_deref(),
        Some("You estimate prices of items. Reply only with the price, no explanation.")
    );
}

#[tokio::test]
async fn test_unparsable_reply_defaults_to_zero() {
    let model = MockModel::new().with_reply("I cannot tell");
    let estimator = setup_estimator(&corpus(), model).await;

    let estimate = estimator.estimate_price("Mystery box").await.unwrap();

    assert_eq!(estimate.value, 0.0);
    assert_eq!(estimate.source, PriceSource::Unparsed);
    assert_eq!(estimate.reply, "I cannot tell");
}

#[tokio::test]
async fn test_small_corpus_returns_corpus_size() {
    let encoder: Arc<dyn Encoder> = Arc::new(HashEncoder::new(DIM));
    let store = Arc::new(MemoryVectorStore::new());
    store.index_items(encoder.as_ref(), &corpus()[..3]).await.unwrap();
    let retriever = SimilarityRetriever::new(encoder, store);

    let similars = retriever.find_similar("Kettle", 5).await.unwrap();

    assert_eq!(similars.len(), 3);
    assert_eq!(similars.documents().len(), similars.prices().len());
}

#[tokio::test]
async fn test_top_k_bounds_neighbors() {
    let model = MockModel::new().with_default_reply("10");
    let estimator = setup_estimator(&corpus(), model.clone())
        .await
        .with_config(PricerConfig::new().with_top_k(2));

    estimator.estimate_price("Desk lamp").await.unwrap();

    let prompt = &model.calls()[0].prompt;
    assert_eq!(prompt.matches("Potentially related product:").count(), 2);
}

#[tokio::test]
async fn test_fallback_and_missing_price_keys() {
    let encoder: Arc<dyn Encoder> = Arc::new(HashEncoder::new(DIM));
    let store = Arc::new(MemoryVectorStore::new());

    let mut legacy = Map::new();
    legacy.insert("selling_price".to_string(), json!(45.5));
    store.insert("Legacy toaster", legacy, encoder.encode("Legacy toaster").await.unwrap());
    store.insert("Unpriced toaster", Map::new(), encoder.encode("Unpriced toaster").await.unwrap());

    let retriever = SimilarityRetriever::new(encoder, store);
    let similars = retriever.find_similar("Toaster", 5).await.unwrap();

    assert_eq!(similars.len(), 2);
    assert_eq!(similars.missing_price_count(), 1);

    let mut prices = similars.prices();
    prices.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(prices, vec![0.0, 45.5]);
}

#[tokio::test]
async fn test_model_error_propagates() {
    let model = MockModel::new().with_network_error("connection reset");
    let estimator = setup_estimator(&corpus(), model).await;

    let err = estimator.estimate_price("Kettle").await.unwrap_err();

    assert!(matches!(err, DealError::Network(_)));
}

struct FailingStore;

#[async_trait]
impl VectorStore for FailingStore {
    async fn query(&self, _embedding: &[f32], _top_k: usize) -> deal_agents::Result<Vec<StoreMatch>> {
        Err(DealError::retrieval("collection not found"))
    }
}

#[tokio::test]
async fn test_store_error_propagates_without_model_call() {
    let model = MockModel::new().with_default_reply("10");
    let retriever = SimilarityRetriever::new(Arc::new(HashEncoder::new(DIM)), Arc::new(FailingStore));
    let estimator = PriceEstimator::new(retriever, Arc::new(model.clone()));

    let err = estimator.estimate_price("Kettle").await.unwrap_err();

    assert!(matches!(err, DealError::Retrieval(_)));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_identical_inputs_give_identical_estimates() {
    let model = MockModel::new().with_default_reply("Price is 88.40");
    let estimator = setup_estimator(&corpus(), model.clone()).await;

    let first = estimator.estimate_price("Cordless drill").await.unwrap();
    let second = estimator.estimate_price("Cordless drill").await.unwrap();

    assert_eq!(first, second);
    let calls = model.calls();
    assert_eq!(calls[0].prompt, calls[1].prompt);
}

#[tokio::test]
async fn test_lazy_encoder_shared_across_pipelines() {
    let lazy = Arc::new(LazyEncoder::new("sha256-hash", DIM, || {
        Ok(Arc::new(HashEncoder::new(DIM)) as Arc<dyn Encoder>)
    }));
    assert!(!lazy.is_initialized());

    let store = Arc::new(MemoryVectorStore::new());
    store.index_items(lazy.as_ref(), &corpus()).await.unwrap();
    assert!(lazy.is_initialized());

    let retriever = SimilarityRetriever::new(lazy, store);
    let similars = retriever.find_similar("Skillet", 5).await.unwrap();
    assert_eq!(similars.len(), 5);
}

fn metadata_of(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn test_string_prices_accepted() {
    let price = deal_agents::pipeline::extract_neighbor_price(&metadata_of(json!({"price": "19.99"})));
    assert_eq!(price.value(), 19.99);
}

proptest! {
    #[test]
    fn prop_encoder_dimension_is_constant(text in ".{0,200}", dim in 1usize..96) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let encoder = HashEncoder::new(dim);

        let vector = runtime.block_on(encoder.encode(&text)).unwrap();

        prop_assert_eq!(vector.len(), dim);
        prop_assert_eq!(encoder.dimension(), dim);
    }
}
