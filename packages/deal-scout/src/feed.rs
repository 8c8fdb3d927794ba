//! Deal feed and memory backed by local JSON files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use deal_agents::{DealError, DealFeed, KnownDealMemory, Opportunity, ScrapedCandidate};
use serde::Deserialize;
use tracing::debug;

/// Reads scraped candidates from a JSON array on disk.
///
/// The file is re-read on every fetch.
pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DealFeed for JsonFileFeed {
    async fn fetch(
        &self,
        selected_feeds: Option<&[String]>,
    ) -> deal_agents::Result<Vec<ScrapedCandidate>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DealError::Feed(format!("{}: {}", self.path.display(), e)))?;
        let candidates: Vec<ScrapedCandidate> = serde_json::from_str(&raw)
            .map_err(|e| DealError::Feed(format!("{}: {}", self.path.display(), e)))?;

        let total = candidates.len();
        let selected: Vec<ScrapedCandidate> = candidates
            .into_iter()
            .filter(|c| selected_feeds.is_none_or(|feeds| feeds.contains(&c.feed)))
            .collect();

        debug!(path = %self.path.display(), total, selected = selected.len(), "Read candidate file");
        Ok(selected)
    }
}

/// Memory file: either surfaced opportunities or plain urls.
#[derive(Deserialize)]
#[serde(untagged)]
enum MemoryFile {
    Opportunities(Vec<Opportunity>),
    Urls(Vec<String>),
}

/// Load known deals from `path`. A missing file means nothing is known yet.
pub async fn load_memory(path: &Path) -> anyhow::Result<KnownDealMemory> {
    use anyhow::Context;

    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Ok(KnownDealMemory::new());
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read memory file {}", path.display()))?;
    let file: MemoryFile = serde_json::from_str(&raw)
        .with_context(|| format!("Memory file {} is not valid", path.display()))?;

    Ok(match file {
        MemoryFile::Opportunities(opportunities) => KnownDealMemory::from_opportunities(&opportunities),
        MemoryFile::Urls(urls) => KnownDealMemory::from_urls(urls),
    })
}
