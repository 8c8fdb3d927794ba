//! Testing utilities including mock implementations.
//!
//! These let applications exercise the pricing and curation pipelines
//! without a model API, an embedding runtime or a live feed.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::{DealError, Result};
use crate::traits::{
    encoder::Encoder,
    feed::DealFeed,
    model::{GenerationOptions, TextModel},
};
use crate::types::deal::ScrapedCandidate;

/// A scripted reply for [`MockModel`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    NetworkError(String),
    ApiError(String),
}

/// Record of a call made to the mock model.
#[derive(Debug, Clone)]
pub struct MockModelCall {
    pub prompt: String,
    pub options: GenerationOptions,
}

/// A mock text model for testing.
///
/// Replies are consumed in order; once the script runs out the default
/// reply is returned for every call.
#[derive(Clone)]
pub struct MockModel {
    name: String,
    script: Arc<RwLock<VecDeque<MockReply>>>,
    default_reply: Arc<RwLock<String>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockModelCall>>>,
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MockModel {
    pub fn new() -> Self {
        Self {
            name: "mock-model".to_string(),
            script: Arc::default(),
            default_reply: Arc::default(),
            calls: Arc::default(),
        }
    }

    /// Reply with `text` on every unscripted call.
    pub fn with_default_reply(self, text: impl Into<String>) -> Self {
        *self.default_reply.write().unwrap() = text.into();
        self
    }

    /// Queue a text reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    /// Queue a transport failure.
    pub fn with_network_error(self, message: impl Into<String>) -> Self {
        self.push(MockReply::NetworkError(message.into()));
        self
    }

    /// Queue an API failure.
    pub fn with_api_error(self, message: impl Into<String>) -> Self {
        self.push(MockReply::ApiError(message.into()));
        self
    }

    fn push(&self, reply: MockReply) {
        self.script.write().unwrap().push_back(reply);
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockModelCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }
}

#[async_trait]
impl TextModel for MockModel {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        self.calls.write().unwrap().push(MockModelCall {
            prompt: prompt.to_string(),
            options: options.clone(),
        });

        let next = self.script.write().unwrap().pop_front();
        match next {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::NetworkError(msg)) => Err(DealError::Network(msg)),
            Some(MockReply::ApiError(msg)) => Err(DealError::Api(msg)),
            None => Ok(self.default_reply.read().unwrap().clone()),
        }
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

/// Deterministic encoder seeded by the SHA-256 of the input.
///
/// Same text, same vector; every vector has the configured dimension.
#[derive(Debug, Clone)]
pub struct HashEncoder {
    dimension: usize,
}

impl HashEncoder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let hash = Sha256::digest(text.as_bytes());

        (0..self.dimension)
            .map(|i| {
                // Mix the position in so repeated hash bytes differ.
                let byte = hash[i % 32].wrapping_add((i / 32) as u8) as f32;
                (byte / 127.5) - 1.0
            })
            .collect()
    }
}

#[async_trait]
impl Encoder for HashEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "sha256-hash"
    }
}

/// In-memory deal feed.
///
/// Candidates are filtered by their `feed` name when specific feeds are
/// requested.
#[derive(Default, Clone)]
pub struct StaticFeed {
    candidates: Vec<ScrapedCandidate>,
    failure: Option<String>,
    fetches: Arc<RwLock<usize>>,
}

impl StaticFeed {
    pub fn new(candidates: Vec<ScrapedCandidate>) -> Self {
        Self {
            candidates,
            ..Default::default()
        }
    }

    /// Fail every fetch with a feed error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.read().unwrap()
    }
}

#[async_trait]
impl DealFeed for StaticFeed {
    async fn fetch(&self, selected_feeds: Option<&[String]>) -> Result<Vec<ScrapedCandidate>> {
        *self.fetches.write().unwrap() += 1;

        if let Some(msg) = &self.failure {
            return Err(DealError::Feed(msg.clone()));
        }

        Ok(self
            .candidates
            .iter()
            .filter(|c| selected_feeds.is_none_or(|feeds| feeds.iter().any(|f| f == &c.feed)))
            .cloned()
            .collect())
    }
}
