//! Price estimation and deal curation pipelines.

pub mod context;
pub mod dedup;
pub mod pricing;
pub mod prompts;
pub mod retrieval;
pub mod scanner;
pub mod selection;

pub use context::{build_context, build_context_from};
pub use dedup::filter_new;
pub use pricing::{get_price, make_prompt, parse_price, PriceEstimator};
pub use retrieval::{extract_neighbor_price, SimilarityRetriever};
pub use scanner::Scanner;
pub use selection::{parse_selection, DealSelector};
