//! Core trait abstractions for the deal agents library.
//!
//! These are the seams where applications plug in a model provider, an
//! encoder, a vector store and a deal feed.

pub mod encoder;
pub mod feed;
pub mod model;
pub mod store;
