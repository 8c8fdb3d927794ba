//! Deal curation: pick the best-described candidates with a clear price.
//!
//! The model gets every candidate in a single JSON-mode prompt and returns a
//! [`DealSelection`]. The reply is validated and filtered before it leaves
//! this module:
//!
//! 1. Code fences around the JSON are tolerated
//! 2. Prices must be numbers or numeric strings, else the whole reply fails
//! 3. Deals missing a url or description are dropped
//! 4. Deals priced at zero or below are dropped, order preserved
//! 5. More than five remaining deals are truncated to five

use std::sync::Arc;

use schemars::schema_for;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::prompts::{SELECTOR_SYSTEM_PROMPT, SELECTOR_USER_PREFIX, SELECTOR_USER_SUFFIX};
use crate::config::SelectorConfig;
use crate::error::{DealError, Result};
use crate::traits::model::{GenerationOptions, ResponseFormat, TextModel};
use crate::types::deal::{CuratedDeal, DealSelection, ScrapedCandidate};
use crate::types::item::numeric_price;

/// Chooses deals worth pricing from a batch of scraped candidates.
#[derive(Clone)]
pub struct DealSelector {
    model: Arc<dyn TextModel>,
    config: SelectorConfig,
}

impl DealSelector {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self {
            model,
            config: SelectorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SelectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Curate `candidates`, collapsing every failure to `None`.
    ///
    /// Failures are logged. Use [`DealSelector::try_select_deals`] to see
    /// the error instead.
    pub async fn select_deals(&self, candidates: &[ScrapedCandidate]) -> Option<DealSelection> {
        match self.try_select_deals(candidates).await {
            Ok(selection) => selection,
            Err(e) => {
                warn!(error = %e, "Deal selection failed, no deals this round");
                None
            }
        }
    }

    /// Curate `candidates`.
    ///
    /// `Ok(None)` when there is nothing to curate; the model is not called.
    pub async fn try_select_deals(
        &self,
        candidates: &[ScrapedCandidate],
    ) -> Result<Option<DealSelection>> {
        if candidates.is_empty() {
            debug!("No candidates to curate");
            return Ok(None);
        }

        let prompt = make_user_prompt(candidates);
        info!(
            model = self.model.model_name(),
            candidates = candidates.len(),
            "Calling model to select deals"
        );
        let reply = self.model.generate(&prompt, &self.options()).await?;

        let selection = parse_selection(&reply)?;
        info!(selected = selection.len(), "Deal selection complete");
        Ok(Some(selection))
    }

    fn options(&self) -> GenerationOptions {
        let options = GenerationOptions::new()
            .with_temperature(0.0)
            .with_system_instruction(SELECTOR_SYSTEM_PROMPT);

        match self.config.use_response_schema.then(selection_schema).flatten() {
            Some(schema) => options.with_json_schema(schema),
            None => GenerationOptions {
                response_format: ResponseFormat::Json { schema: None },
                ..options
            },
        }
    }
}

/// JSON schema of [`DealSelection`] as generated by schemars.
pub fn selection_schema() -> Option<Value> {
    serde_json::to_value(schema_for!(DealSelection)).ok()
}

/// Fixed prefix, each candidate's description block, fixed suffix.
pub fn make_user_prompt(candidates: &[ScrapedCandidate]) -> String {
    let blocks: Vec<String> = candidates.iter().map(ScrapedCandidate::describe).collect();
    format!(
        "{}{}{}",
        SELECTOR_USER_PREFIX,
        blocks.join("\n\n"),
        SELECTOR_USER_SUFFIX
    )
}

/// Deal as the model sent it, before the price is checked.
#[derive(Deserialize)]
struct RawDeal {
    product_description: String,
    price: Value,
    url: String,
}

#[derive(Deserialize)]
struct RawSelection {
    deals: Vec<RawDeal>,
}

/// Parse, validate and filter a curation reply.
///
/// Prices may arrive as numbers or numeric strings; anything else fails the
/// reply with [`DealError::Validation`]. Incomplete and unpriced deals are
/// dropped, then the rest is capped at [`DealSelection::MAX_DEALS`].
pub fn parse_selection(reply: &str) -> Result<DealSelection> {
    let raw: RawSelection = serde_json::from_str(strip_code_fences(reply))?;

    let deals = raw
        .deals
        .into_iter()
        .enumerate()
        .map(|(pos, deal)| {
            let price = numeric_price(&deal.price).ok_or_else(|| {
                DealError::validation(format!("deal {} has a non-numeric price: {}", pos, deal.price))
            })?;
            Ok(CuratedDeal {
                product_description: deal.product_description,
                price,
                url: deal.url,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let mut selection = DealSelection::new(deals);

    let incomplete = selection.retain_complete();
    if incomplete > 0 {
        warn!(dropped = incomplete, "Dropped deals missing a url or description");
    }

    let unpriced = selection.retain_priced();
    if unpriced > 0 {
        debug!(dropped = unpriced, "Dropped deals without a positive price");
    }

    if selection.len() > DealSelection::MAX_DEALS {
        warn!(
            returned = selection.len(),
            max = DealSelection::MAX_DEALS,
            "Model returned too many deals, truncating"
        );
        selection.deals.truncate(DealSelection::MAX_DEALS);
    }

    Ok(selection)
}

/// Remove a surrounding markdown code fence, if any.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the language tag on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
