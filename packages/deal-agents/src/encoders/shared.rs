//! Lazily-initialized shared encoder.
//!
//! Loading an embedding model is expensive (weights on disk or a download),
//! so it happens once per process on first use. Afterwards the encoder is
//! read-only and every pipeline shares the same instance through an `Arc`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::{DealError, Result};
use crate::traits::encoder::Encoder;

type EncoderFactory = dyn Fn() -> Result<Arc<dyn Encoder>> + Send + Sync;

/// An encoder built on first use and reused afterwards.
///
/// The factory runs on the blocking pool, at most once. Concurrent first
/// callers wait for the same initialization. A failed initialization is not
/// cached; the next call tries again.
pub struct LazyEncoder {
    cell: OnceCell<Arc<dyn Encoder>>,
    factory: Arc<EncoderFactory>,
    model_name: String,
    dimension: usize,
}

impl LazyEncoder {
    /// Create a lazy encoder.
    ///
    /// `dimension` must match what the factory's encoder produces; it is
    /// checked once the encoder is built.
    pub fn new<F>(model_name: impl Into<String>, dimension: usize, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Encoder>> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Arc::new(factory),
            model_name: model_name.into(),
            dimension,
        }
    }

    /// Whether the underlying encoder has been built.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    async fn get(&self) -> Result<&Arc<dyn Encoder>> {
        self.cell
            .get_or_try_init(|| async {
                info!(model = %self.model_name, "Initializing shared encoder");
                let factory = Arc::clone(&self.factory);
                let encoder = tokio::task::spawn_blocking(move || factory())
                    .await
                    .map_err(|e| DealError::Embedding(format!("encoder init panicked: {}", e)))??;

                if encoder.dimension() != self.dimension {
                    return Err(DealError::Config(format!(
                        "encoder {} has dimension {}, expected {}",
                        encoder.model_name(),
                        encoder.dimension(),
                        self.dimension
                    )));
                }
                Ok(encoder)
            })
            .await
    }
}

impl fmt::Debug for LazyEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyEncoder")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[async_trait]
impl Encoder for LazyEncoder {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.get().await?.encode(text).await
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
