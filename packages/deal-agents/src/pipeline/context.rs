//! Grounding context for price estimation.

use super::prompts::CONTEXT_PREAMBLE;
use crate::types::item::SimilaritySet;

/// Render neighbors into a prompt fragment, in retrieval order.
///
/// Pairs are zipped; a longer side is ignored past the shorter one.
pub fn build_context(documents: &[String], prices: &[f64]) -> String {
    let mut message = String::from(CONTEXT_PREAMBLE);
    for (document, price) in documents.iter().zip(prices) {
        message.push_str(&format!(
            "Potentially related product:\n{}\nPrice is ${:.2}\n\n",
            document, price
        ));
    }
    message
}

/// [`build_context`] over a retrieval result.
pub fn build_context_from(similars: &SimilaritySet) -> String {
    build_context(similars.documents(), &similars.prices())
}
