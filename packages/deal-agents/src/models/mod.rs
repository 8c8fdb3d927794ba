//! Generative model implementations.
//!
//! This module provides reference implementations of the `TextModel` trait.
//! Applications can use these directly or implement their own.

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiModel, DEFAULT_GEMINI_MODEL};
