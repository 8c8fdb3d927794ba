//! Priced items, retrieval results and price estimates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A historical product description with its known price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedItem {
    /// Short product description
    pub description: String,

    /// Price in dollars
    pub price: f64,
}

impl PricedItem {
    pub fn new(description: impl Into<String>, price: f64) -> Self {
        Self {
            description: description.into(),
            price,
        }
    }
}

/// Where a neighbor's price came from in the store metadata.
///
/// The historical corpus stores prices under two different keys. `Missing`
/// still reads as 0.0, but callers can see it happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum NeighborPrice {
    /// Found under the primary `price` key
    Primary(f64),

    /// Found under the fallback `selling_price` key
    Fallback(f64),

    /// Neither key held a number
    Missing,
}

impl NeighborPrice {
    /// Numeric value, 0.0 when missing.
    pub fn value(&self) -> f64 {
        match self {
            Self::Primary(v) | Self::Fallback(v) => *v,
            Self::Missing => 0.0,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Neighbors of a query description, most similar first.
///
/// Documents and prices are always the same length: the only way to grow the
/// set is [`SimilaritySet::push`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilaritySet {
    documents: Vec<String>,
    prices: Vec<NeighborPrice>,
}

impl SimilaritySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next-ranked neighbor.
    pub fn push(&mut self, document: impl Into<String>, price: NeighborPrice) {
        self.documents.push(document.into());
        self.prices.push(price);
    }

    /// Neighbor documents in rank order.
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Neighbor prices in rank order, 0.0 where missing.
    pub fn prices(&self) -> Vec<f64> {
        self.prices.iter().map(NeighborPrice::value).collect()
    }

    /// Number of neighbors whose price defaulted to 0.0.
    pub fn missing_price_count(&self) -> usize {
        self.prices.iter().filter(|p| p.is_missing()).count()
    }

    /// Neighbors as priced items.
    pub fn items(&self) -> impl Iterator<Item = PricedItem> + '_ {
        self.documents
            .iter()
            .zip(&self.prices)
            .map(|(doc, price)| PricedItem::new(doc.clone(), price.value()))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Split into parallel `(documents, prices)` sequences.
    pub fn into_parts(self) -> (Vec<String>, Vec<f64>) {
        let prices = self.prices.iter().map(NeighborPrice::value).collect();
        (self.documents, prices)
    }
}

/// Read a price from JSON: a number or a numeric string.
///
/// Non-finite values and anything else count as absent.
pub fn numeric_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Whether an estimate was read from the model reply or defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    /// A numeric token was found in the reply
    Parsed,

    /// No numeric token; value defaulted to 0.0
    Unparsed,
}

/// Output of one price-estimation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    /// Estimated price in dollars (0.0 when unparsed)
    pub value: f64,

    /// How the value was obtained
    pub source: PriceSource,

    /// Raw model reply, trimmed
    pub reply: String,
}

impl PriceEstimate {
    /// Build an estimate from an optional parsed value.
    pub fn from_parsed(parsed: Option<f64>, reply: impl Into<String>) -> Self {
        let reply = reply.into();
        match parsed {
            Some(value) => Self {
                value,
                source: PriceSource::Parsed,
                reply,
            },
            None => Self {
                value: 0.0,
                source: PriceSource::Unparsed,
                reply,
            },
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.source == PriceSource::Parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_set_parts_stay_parallel() {
        let mut set = SimilaritySet::new();
        set.push("Desk lamp", NeighborPrice::Primary(24.5));
        set.push("Floor lamp", NeighborPrice::Fallback(60.0));
        set.push("Lamp shade", NeighborPrice::Missing);

        assert_eq!(set.len(), 3);
        assert_eq!(set.missing_price_count(), 1);

        let (documents, prices) = set.into_parts();
        assert_eq!(documents.len(), prices.len());
        assert_eq!(prices, vec![24.5, 60.0, 0.0]);
    }

    #[test]
    fn test_items_keep_rank_order() {
        let mut set = SimilaritySet::new();
        set.push("first", NeighborPrice::Primary(1.0));
        set.push("second", NeighborPrice::Primary(2.0));

        let items: Vec<PricedItem> = set.items().collect();
        assert_eq!(items[0], PricedItem::new("first", 1.0));
        assert_eq!(items[1], PricedItem::new("second", 2.0));
    }

    #[test]
    fn test_numeric_price_accepts_numbers_and_numeric_strings() {
        assert_eq!(numeric_price(&serde_json::json!(42)), Some(42.0));
        assert_eq!(numeric_price(&serde_json::json!(" 10.50 ")), Some(10.5));
        assert_eq!(numeric_price(&serde_json::json!("NaN")), None);
        assert_eq!(numeric_price(&serde_json::json!("ten")), None);
        assert_eq!(numeric_price(&serde_json::json!(null)), None);
    }

    #[test]
    fn test_unparsed_estimate_defaults_to_zero() {
        let estimate = PriceEstimate::from_parsed(None, "no idea");
        assert_eq!(estimate.value, 0.0);
        assert!(!estimate.is_parsed());

        let estimate = PriceEstimate::from_parsed(Some(19.99), "19.99");
        assert_eq!(estimate.value, 19.99);
        assert!(estimate.is_parsed());
    }
}
