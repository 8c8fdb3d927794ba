//! Prompts for price estimation and deal curation.

/// System instruction for price estimation.
pub const PRICER_SYSTEM_PROMPT: &str =
    "You estimate prices of items. Reply only with the price, no explanation.";

/// Opening sentence of the grounding context.
pub const CONTEXT_PREAMBLE: &str = "To provide some context, here are some other items that might be similar to the item you need to estimate.\n\n";

/// Question placed between the context and the item.
pub const PRICE_QUESTION: &str = "How much does this cost?\n\n";

/// Forced completion prefix: the reply continues right after the `$`.
pub const PRICE_COMPLETION_PREFIX: &str = "\n\nPrice is $";

/// System instruction for deal curation.
///
/// The warning about "$XXX off" stays: the model otherwise tends to report
/// the discount as the price.
pub const SELECTOR_SYSTEM_PROMPT: &str = r#"You identify and summarize the 5 most detailed deals from a list, by selecting deals that have the most detailed, high quality description and the most clear price.
Respond strictly in JSON with no explanation, using this format. You should provide the price as a number derived from the description. If the price of a deal isn't clear, do not include that deal in your response.
Most important is that you respond with the 5 deals that have the most detailed product description with price. It's not important to mention the terms of the deal; most important is a thorough description of the product.
Be careful with products that are described as "$XXX off" or "reduced by $XXX" - this isn't the actual price of the product. Only respond with products when you are highly confident about the price.

{"deals": [
  {
    "product_description": "A 4-5 sentence paragraph describing the product itself in detail.",
    "price": 99.99,
    "url": "the url as provided"
  }
]}"#;

/// Opening of the curation user prompt, before the candidate list.
pub const SELECTOR_USER_PREFIX: &str = r#"Respond with the most promising 5 deals from this list, selecting those which have the most detailed, high quality product description and a clear price that is greater than 0.
Respond strictly in JSON, and only JSON. You should rephrase the description to be a summary of the product itself, not the terms of the deal.
Remember to respond with a paragraph of text in the product_description field for each of the 5 items that you select.
Be careful with products that are described as "$XXX off" or "reduced by $XXX" - this isn't the actual price of the product. Only respond with products when you are highly confident about the price.

Deals:

"#;

/// Close of the curation user prompt.
pub const SELECTOR_USER_SUFFIX: &str = "\n\nStrictly respond in JSON and include exactly 5 deals, no more.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_warning_present() {
        assert!(SELECTOR_SYSTEM_PROMPT.contains("\"$XXX off\""));
        assert!(SELECTOR_USER_PREFIX.contains("\"reduced by $XXX\""));
    }

    #[test]
    fn test_completion_prefix_ends_with_open_currency() {
        assert!(PRICE_COMPLETION_PREFIX.ends_with('$'));
    }
}
