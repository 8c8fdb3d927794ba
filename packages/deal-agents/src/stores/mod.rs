//! Vector store implementations.
//!
//! - `MemoryVectorStore` - in-memory cosine search (tests, small corpora)
//! - `ChromaStore` - HTTP client for a Chroma collection

pub mod chroma;
pub mod memory;

pub use chroma::ChromaStore;
pub use memory::MemoryVectorStore;
