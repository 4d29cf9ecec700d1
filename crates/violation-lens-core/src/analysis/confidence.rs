//! Per-category confidence

use crate::category::Category;

/// Multiplier applied to the hit ratio before capping at 1.0
pub const CONFIDENCE_BOOST: f64 = 2.0;

/// `min(matched / total * 2, 1.0)`; 0 for a category without patterns.
///
/// Counts regex hits on the raw text only, whichever pass flagged the
/// category. A keyword-only match therefore scores 0.
pub fn confidence(category: &Category, text: &str) -> f64 {
    confidence_from_counts(category.matched_pattern_count(text), category.patterns().len())
}

pub fn confidence_from_counts(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (matched as f64 / total as f64 * CONFIDENCE_BOOST).min(1.0)
}
