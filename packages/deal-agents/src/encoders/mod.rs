//! Encoder implementations.
//!
//! - `LazyEncoder` - builds any encoder once, on first use (always available)
//! - `FastEmbedEncoder` - local ONNX models (requires `fastembed` feature)
//! - `GeminiEncoder` - remote embeddings (requires `gemini` feature)

pub mod shared;

#[cfg(feature = "fastembed")]
pub mod fastembed;

#[cfg(feature = "gemini")]
pub mod gemini;

pub use shared::LazyEncoder;

#[cfg(feature = "fastembed")]
pub use self::fastembed::FastEmbedEncoder;

#[cfg(feature = "gemini")]
pub use gemini::GeminiEncoder;
