//! Retrieval-augmented price estimation.
//!
//! One pass per description: retrieve similar priced items, render them as
//! context, ask the model once for a bare number, and parse it.
//!
//! ```rust,ignore
//! let estimator = PriceEstimator::new(retriever, model);
//! let estimate = estimator.estimate_price("Cordless drill, 18V, two batteries").await?;
//! println!("${:.2}", estimate.value);
//! ```

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, info, warn};

use super::context::build_context_from;
use super::prompts::{PRICER_SYSTEM_PROMPT, PRICE_COMPLETION_PREFIX, PRICE_QUESTION};
use super::retrieval::SimilarityRetriever;
use crate::config::PricerConfig;
use crate::error::Result;
use crate::traits::model::{GenerationOptions, TextModel};
use crate::types::item::PriceEstimate;

// ASCII digits only: `\d` would also match digits `f64::from_str` rejects.
static PRICE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:[0-9]*\.[0-9]+|[0-9]+)").expect("price regex is valid")
});

/// Estimates the market price of a product description.
#[derive(Clone)]
pub struct PriceEstimator {
    retriever: SimilarityRetriever,
    model: Arc<dyn TextModel>,
    config: PricerConfig,
}

impl PriceEstimator {
    pub fn new(retriever: SimilarityRetriever, model: Arc<dyn TextModel>) -> Self {
        Self {
            retriever,
            model,
            config: PricerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PricerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PricerConfig {
        &self.config
    }

    /// Estimate the price of `description`.
    ///
    /// Makes exactly one model call. Retrieval and model failures propagate;
    /// an unparsable reply yields 0.0 tagged [`PriceSource::Unparsed`].
    ///
    /// [`PriceSource::Unparsed`]: crate::types::item::PriceSource::Unparsed
    pub async fn estimate_price(&self, description: &str) -> Result<PriceEstimate> {
        let similars = self
            .retriever
            .find_similar(description, self.config.top_k)
            .await?;
        let prompt = make_prompt(&build_context_from(&similars), description);

        info!(
            model = self.model.model_name(),
            neighbors = similars.len(),
            "Calling model to estimate price"
        );
        let reply = self.model.generate(&prompt, &self.options()).await?;

        let estimate = PriceEstimate::from_parsed(parse_price(&reply), reply.trim());
        if estimate.is_parsed() {
            info!(price = estimate.value, "Price estimate complete");
        } else {
            warn!(reply = %estimate.reply, "No price in model reply, using 0.0");
        }
        if estimate.value < 0.0 {
            warn!(price = estimate.value, "Model returned a negative price");
        }

        Ok(estimate)
    }

    fn options(&self) -> GenerationOptions {
        GenerationOptions::new()
            .with_temperature(0.0)
            .with_max_output_tokens(self.config.max_output_tokens)
            .with_system_instruction(PRICER_SYSTEM_PROMPT)
    }
}

/// Assemble the pricing prompt: context, question, item, open completion.
pub fn make_prompt(context: &str, description: &str) -> String {
    let prompt = format!(
        "{}{}{}{}",
        context, PRICE_QUESTION, description, PRICE_COMPLETION_PREFIX
    );
    debug!(prompt_len = prompt.len(), "Built pricing prompt");
    prompt
}

/// First numeric token in `text` after removing `$` and `,`.
///
/// A leading sign is kept. Returns `None` when there is no number.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned = text.replace(['$', ','], "");
    PRICE_TOKEN
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// [`parse_price`] defaulting to 0.0.
pub fn get_price(text: &str) -> f64 {
    parse_price(text).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_and_thousands_separator() {
        assert_eq!(get_price("$1,234.56"), 1234.56);
    }

    #[test]
    fn test_number_inside_prose() {
        assert_eq!(get_price("about 42 dollars"), 42.0);
    }

    #[test]
    fn test_no_number() {
        assert_eq!(parse_price("no price mentioned"), None);
        assert_eq!(get_price("no price mentioned"), 0.0);
    }

    #[test]
    fn test_sign_is_kept() {
        assert_eq!(get_price("-3.5% off"), -3.5);
        assert_eq!(get_price("-12"), -12.0);
    }

    #[test]
    fn test_leading_decimal_point() {
        assert_eq!(get_price(".99"), 0.99);
    }

    #[test]
    fn test_non_ascii_digits_are_not_prices() {
        assert_eq!(parse_price("٤٢"), None);
        assert_eq!(parse_price("４２"), None);
        assert_eq!(get_price("٤ then 42"), 42.0);
    }

    #[test]
    fn test_first_token_wins() {
        assert_eq!(get_price("149.99 or 129.99 on sale"), 149.99);
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = make_prompt("CONTEXT\n\n", "Walnut desk");
        assert_eq!(
            prompt,
            "CONTEXT\n\nHow much does this cost?\n\nWalnut desk\n\nPrice is $"
        );
    }
}
