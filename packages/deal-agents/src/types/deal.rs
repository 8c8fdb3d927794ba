//! Deal types - scraped candidates, curated selections and opportunities.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A deal as scraped from a feed, before any curation.
///
/// The url is the identity key used for deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedCandidate {
    /// Canonical deal url
    pub url: String,

    /// Headline if the feed provided one
    #[serde(default)]
    pub title: Option<String>,

    /// Raw descriptive text (summary, details, features)
    pub details: String,

    /// Feed the candidate came from
    #[serde(default)]
    pub feed: String,
}

impl ScrapedCandidate {
    pub fn new(url: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            details: details.into(),
            feed: String::new(),
        }
    }

    /// Set the headline.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the originating feed.
    pub fn with_feed(mut self, feed: impl Into<String>) -> Self {
        self.feed = feed.into();
        self
    }

    /// Render the candidate as a prompt block.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        if let Some(title) = &self.title {
            out.push_str(&format!("Title: {}\n", title));
        }
        out.push_str(&format!("Details: {}\n", self.details.trim()));
        out.push_str(&format!("URL: {}", self.url));
        out
    }
}

/// Urls of deals already surfaced to the user.
///
/// Supplied by the caller for each scan; never persisted here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownDealMemory {
    urls: HashSet<String>,
}

impl KnownDealMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build memory from plain urls.
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    /// Build memory from previously surfaced opportunities.
    pub fn from_opportunities<'a>(opportunities: impl IntoIterator<Item = &'a Opportunity>) -> Self {
        Self::from_urls(opportunities.into_iter().map(|o| o.deal.url.clone()))
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KnownDealMemory {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_urls(iter)
    }
}

/// A deal selected and rephrased by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CuratedDeal {
    /// A 4-5 sentence paragraph describing the product itself in detail,
    /// not the terms of the deal.
    pub product_description: String,

    /// The actual price of the product, not a discount amount.
    pub price: f64,

    /// The url as provided.
    pub url: String,
}

/// The output of one curation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DealSelection {
    /// The selected deals, best first.
    pub deals: Vec<CuratedDeal>,
}

impl DealSelection {
    /// Upper bound on deals in a finalized selection.
    pub const MAX_DEALS: usize = 5;

    pub fn new(deals: Vec<CuratedDeal>) -> Self {
        Self { deals }
    }

    /// Drop deals with a blank url or description, keeping order.
    ///
    /// Returns how many were dropped.
    pub fn retain_complete(&mut self) -> usize {
        let before = self.deals.len();
        self.deals.retain(|deal| {
            !deal.url.trim().is_empty() && !deal.product_description.trim().is_empty()
        });
        before - self.deals.len()
    }

    /// Drop deals without a strictly positive price, keeping order.
    ///
    /// Returns how many were dropped.
    pub fn retain_priced(&mut self) -> usize {
        let before = self.deals.len();
        self.deals.retain(|deal| deal.price > 0.0);
        before - self.deals.len()
    }

    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }
}

/// A curated deal paired with an estimate of what it should cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub deal: CuratedDeal,

    /// Estimated market price
    pub estimate: f64,

    /// `estimate - deal.price`; positive means the deal undercuts the market
    pub discount: f64,
}

impl Opportunity {
    pub fn new(deal: CuratedDeal, estimate: f64) -> Self {
        let discount = estimate - deal.price;
        Self {
            deal,
            estimate,
            discount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(url: &str, price: f64) -> CuratedDeal {
        CuratedDeal {
            product_description: format!("Product at {}", url),
            price,
            url: url.to_string(),
        }
    }

    #[test]
    fn test_describe_includes_title_details_and_url() {
        let candidate = ScrapedCandidate::new("https://deals.example/1", "  Noise cancelling headphones  ")
            .with_title("Headphones for $199");

        assert_eq!(
            candidate.describe(),
            "Title: Headphones for $199\nDetails: Noise cancelling headphones\nURL: https://deals.example/1"
        );
    }

    #[test]
    fn test_describe_without_title() {
        let candidate = ScrapedCandidate::new("u", "text");
        assert_eq!(candidate.describe(), "Details: text\nURL: u");
    }

    #[test]
    fn test_retain_priced_keeps_positive_in_order() {
        let mut selection = DealSelection::new(vec![
            deal("a", 10.0),
            deal("b", 0.0),
            deal("c", -5.0),
            deal("d", 20.0),
            deal("e", 30.0),
        ]);

        let dropped = selection.retain_priced();

        assert_eq!(dropped, 2);
        let urls: Vec<&str> = selection.deals.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "d", "e"]);
    }

    #[test]
    fn test_retain_complete_drops_blank_fields() {
        let mut blank_url = deal("", 12.0);
        blank_url.product_description = "Toaster".to_string();
        let mut blank_description = deal("c", 14.0);
        blank_description.product_description = " ".to_string();

        let mut selection =
            DealSelection::new(vec![deal("a", 10.0), blank_url, blank_description, deal("d", 9.0)]);

        assert_eq!(selection.retain_complete(), 2);
        let urls: Vec<&str> = selection.deals.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "d"]);
    }

    #[test]
    fn test_memory_from_opportunities() {
        let opportunities = vec![
            Opportunity::new(deal("a", 50.0), 80.0),
            Opportunity::new(deal("b", 10.0), 9.0),
        ];

        let memory = KnownDealMemory::from_opportunities(&opportunities);

        assert!(memory.contains("a"));
        assert!(memory.contains("b"));
        assert!(!memory.contains("c"));
        assert_eq!(opportunities[0].discount, 30.0);
        assert_eq!(opportunities[1].discount, -1.0);
    }

    #[test]
    fn test_selection_parses_from_model_json() {
        let selection: DealSelection = serde_json::from_str(
            r#"{"deals": [{"product_description": "A kettle.", "price": 39.99, "url": "u1"}]}"#,
        )
        .unwrap();

        assert_eq!(selection.len(), 1);
        assert_eq!(selection.deals[0].price, 39.99);
    }
}
