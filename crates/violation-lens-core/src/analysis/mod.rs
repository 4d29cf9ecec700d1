//! Detail records derived from a classification: confidence, evidence and
//! aggregate statistics.

mod confidence;
mod evidence;
mod stats;

use serde::Serialize;

pub use confidence::{confidence, confidence_from_counts, CONFIDENCE_BOOST};
pub use evidence::{extract_evidence, CONTEXT_CHARS, EVIDENCE_DELIMITER, MAX_WINDOWS};
pub use stats::{Suggestions, ViolationStatistics, OPTIMIZATION_TIPS, SAMPLE_LIMIT};

/// Supporting information for one matched category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationDetail {
    pub category: String,
    pub description: String,
    pub count: usize,
    /// In [0, 1]
    pub confidence: f64,
    /// Empty when no pattern hit the text directly
    pub evidence: String,
}

/// Categories of one text plus one detail record per category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchResult {
    /// Sorted, no duplicates
    pub categories: Vec<String>,
    pub details: Vec<ViolationDetail>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn detail(&self, category: &str) -> Option<&ViolationDetail> {
        self.details.iter().find(|d| d.category == category)
    }
}
