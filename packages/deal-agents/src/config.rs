//! Configuration for the pricing and curation pipelines.

use serde::{Deserialize, Serialize};

/// Configuration for retrieval-augmented price estimation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricerConfig {
    /// Neighbors retrieved as grounding context. Default: 5.
    pub top_k: usize,

    /// Output cap for the price reply.
    ///
    /// Kept tiny so the model answers with a number, not an explanation.
    /// Default: 5.
    pub max_output_tokens: u32,
}

impl Default for PricerConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            max_output_tokens: 5,
        }
    }
}

impl PricerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Configuration for deal selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Send a JSON schema derived from `DealSelection` with the request.
    ///
    /// When false the model only gets JSON mode plus the example in the
    /// system prompt. Default: true.
    pub use_response_schema: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            use_response_schema: true,
        }
    }
}

impl SelectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response_schema(mut self, enabled: bool) -> Self {
        self.use_response_schema = enabled;
        self
    }
}
