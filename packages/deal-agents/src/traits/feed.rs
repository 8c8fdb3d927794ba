//! Feed trait for scraped deal candidates.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::deal::ScrapedCandidate;

/// Supplies freshly scraped deal candidates.
///
/// Scraping and feed parsing live outside this library; implementations
/// only hand back candidates for the selected feeds.
#[async_trait]
pub trait DealFeed: Send + Sync {
    /// Fetch candidates from the named feeds. `None` means every feed.
    async fn fetch(&self, selected_feeds: Option<&[String]>) -> Result<Vec<ScrapedCandidate>>;
}
