//! Data types shared by the pricing and curation pipelines.

pub mod deal;
pub mod item;
