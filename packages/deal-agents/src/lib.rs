//! Deal Agents Library
//!
//! Retrieval-augmented price estimation and model-driven deal curation.
//!
//! # Pipelines
//!
//! - **Pricing**: embed a product description, find similar priced items in a
//!   vector store, show them to a text model as context and parse the number
//!   it replies with.
//! - **Curation**: drop deals already surfaced, then ask the model to pick
//!   and summarize the best-described ones with a clear price.
//!
//! Both stages are strictly sequential. Collaborators are injected behind
//! traits, so a deterministic backend gives deterministic results.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use deal_agents::{MemoryVectorStore, PriceEstimator, SimilarityRetriever};
//! use deal_agents::testing::{HashEncoder, MockModel};
//!
//! let encoder = Arc::new(HashEncoder::new(384));
//! let store = Arc::new(MemoryVectorStore::new());
//! store.index_items(encoder.as_ref(), &corpus).await?;
//!
//! let retriever = SimilarityRetriever::new(encoder, store);
//! let estimator = PriceEstimator::new(retriever, Arc::new(MockModel::new().with_reply("129.99")));
//! let estimate = estimator.estimate_price("Cordless drill, 18V").await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (TextModel, Encoder, VectorStore, DealFeed)
//! - [`types`] - Priced items, estimates, candidates and selections
//! - [`pipeline`] - Retrieval, pricing, dedup, selection and scanning
//! - [`encoders`] - Encoder implementations and lazy initialization
//! - [`stores`] - Vector store implementations (MemoryVectorStore, ChromaStore)
//! - [`models`] - Text model implementations (GeminiModel)
//! - [`testing`] - Mock implementations for testing

pub mod config;
pub mod encoders;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use config::{PricerConfig, SelectorConfig};
pub use encoders::LazyEncoder;
pub use error::{DealError, Result};
pub use pipeline::{
    filter_new, DealSelector, PriceEstimator, Scanner, SimilarityRetriever,
};
pub use stores::{ChromaStore, MemoryVectorStore};
pub use traits::{
    encoder::Encoder,
    feed::DealFeed,
    model::{GenerationOptions, ResponseFormat, TextModel},
    store::{StoreMatch, VectorStore},
};
pub use types::{
    deal::{CuratedDeal, DealSelection, KnownDealMemory, Opportunity, ScrapedCandidate},
    item::{NeighborPrice, PriceEstimate, PriceSource, PricedItem, SimilaritySet},
};
