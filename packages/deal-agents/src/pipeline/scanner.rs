//! One scan: fetch, dedupe, curate.

use std::sync::Arc;

use tracing::{info, warn};

use super::dedup::filter_new;
use super::selection::DealSelector;
use crate::error::Result;
use crate::traits::feed::DealFeed;
use crate::types::deal::{DealSelection, KnownDealMemory, ScrapedCandidate};

/// Looks for new deals on the configured feeds.
#[derive(Clone)]
pub struct Scanner {
    feed: Arc<dyn DealFeed>,
    selector: DealSelector,
}

impl Scanner {
    pub fn new(feed: Arc<dyn DealFeed>, selector: DealSelector) -> Self {
        Self { feed, selector }
    }

    /// Fetch candidates from `selected_feeds` that are not already in `memory`.
    pub async fn fetch_deals(
        &self,
        memory: &KnownDealMemory,
        selected_feeds: Option<&[String]>,
    ) -> Result<Vec<ScrapedCandidate>> {
        let scraped = self.feed.fetch(selected_feeds).await?;
        let fresh = filter_new(scraped, memory);
        info!(new = fresh.len(), "Fetched new candidate deals");
        Ok(fresh)
    }

    /// Run a scan, returning the tagged error on failure.
    pub async fn try_scan(
        &self,
        memory: &KnownDealMemory,
        selected_feeds: Option<&[String]>,
    ) -> Result<Option<DealSelection>> {
        let fresh = self.fetch_deals(memory, selected_feeds).await?;
        let selection = self.selector.try_select_deals(&fresh).await?;

        match &selection {
            Some(s) => info!(selected = s.len(), "Scan selected deals"),
            None => info!("Scan found no new deals"),
        }
        Ok(selection)
    }

    /// Run a scan, collapsing failures to `None` with a logged warning.
    pub async fn scan(
        &self,
        memory: &KnownDealMemory,
        selected_feeds: Option<&[String]>,
    ) -> Option<DealSelection> {
        match self.try_scan(memory, selected_feeds).await {
            Ok(selection) => selection,
            Err(e) => {
                warn!(error = %e, "Scan failed, no deals this round");
                None
            }
        }
    }
}
