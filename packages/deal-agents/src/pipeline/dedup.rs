//! Drop candidates that were already surfaced.

use tracing::debug;

use crate::types::deal::{KnownDealMemory, ScrapedCandidate};

/// Keep candidates whose url is not in `memory`, in their original order.
///
/// Duplicates within `candidates` itself are left alone.
pub fn filter_new(
    candidates: Vec<ScrapedCandidate>,
    memory: &KnownDealMemory,
) -> Vec<ScrapedCandidate> {
    let total = candidates.len();
    let fresh: Vec<ScrapedCandidate> = candidates
        .into_iter()
        .filter(|candidate| !memory.contains(&candidate.url))
        .collect();

    debug!(total, new = fresh.len(), known = memory.len(), "Filtered known deals");
    fresh
}
