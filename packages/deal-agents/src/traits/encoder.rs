//! Encoder trait for text embeddings.

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into a fixed-dimension vector.
///
/// Implementations must be deterministic for a given model and input, and
/// must return exactly [`Encoder::dimension`] values for every input,
/// including the empty string. Encoders are shared read-only across
/// pipelines as `Arc<dyn Encoder>`.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Embed a single text.
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Output dimension.
    fn dimension(&self) -> usize;

    /// Model identifier, for logs.
    fn model_name(&self) -> &str;
}
