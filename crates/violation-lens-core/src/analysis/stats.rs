//! Aggregates over many texts
//!
//! Both aggregates are built from repeated single-text classification
//! against one snapshot.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::registry::RegistrySnapshot;

use super::MatchResult;

/// Samples kept per suggestion list
pub const SAMPLE_LIMIT: usize = 5;

/// Details below this confidence mark a text as a low-confidence sample
const LOW_CONFIDENCE: f64 = 0.5;

pub const OPTIMIZATION_TIPS: &[&str] = &[
    "Add more domain-specific keywords",
    "Tighten regular expressions to improve precision",
    "Add gap patterns for phrasings that separate the key terms",
    "Review the rule set regularly to follow new violation forms",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViolationStatistics {
    /// Texts classified into each category
    pub violation_counts: BTreeMap<String, usize>,
    /// category -> pattern -> texts whose category match included a hit of that pattern
    pub pattern_matches: BTreeMap<String, BTreeMap<String, usize>>,
    pub total_texts: usize,
    /// Share of all texts with at least one category
    pub violation_rate: f64,
}

impl ViolationStatistics {
    pub(crate) fn collect<S, F>(texts: &[S], snapshot: &RegistrySnapshot, mut classify: F) -> Self
    where
        S: AsRef<str>,
        F: FnMut(&str) -> Vec<String>,
    {
        let mut stats = Self {
            total_texts: texts.len(),
            ..Self::default()
        };
        let mut violating = 0usize;

        for text in texts.iter().map(AsRef::as_ref) {
            if text.is_empty() {
                continue;
            }

            let categories = classify(text);
            if !categories.is_empty() {
                violating += 1;
            }

            for name in categories {
                *stats.violation_counts.entry(name.clone()).or_insert(0) += 1;

                let Some(category) = snapshot.get(&name) else {
                    continue;
                };
                for pattern in category.patterns().iter().filter(|p| p.is_match(text)) {
                    *stats
                        .pattern_matches
                        .entry(name.clone())
                        .or_default()
                        .entry(pattern.source().to_string())
                        .or_insert(0) += 1;
                }
            }
        }

        if stats.total_texts > 0 {
            stats.violation_rate = violating as f64 / stats.total_texts as f64;
        }
        stats
    }
}

/// Samples that point at gaps in the rule set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Suggestions {
    /// Texts where some matched category scored below 0.5
    pub low_confidence_samples: Vec<String>,
    /// Non-empty texts without any category
    pub unmatched_samples: Vec<String>,
    pub optimization_tips: Vec<String>,
}

impl Suggestions {
    pub(crate) fn collect<S, F>(texts: &[S], mut details: F) -> Self
    where
        S: AsRef<str>,
        F: FnMut(&str) -> MatchResult,
    {
        let mut suggestions = Self {
            optimization_tips: OPTIMIZATION_TIPS.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        };

        for text in texts.iter().map(AsRef::as_ref) {
            if text.is_empty() {
                continue;
            }

            let result = details(text);
            if result.is_empty() {
                if suggestions.unmatched_samples.len() < SAMPLE_LIMIT {
                    suggestions.unmatched_samples.push(text.to_string());
                }
            } else if result.details.iter().any(|d| d.confidence < LOW_CONFIDENCE)
                && suggestions.low_confidence_samples.len() < SAMPLE_LIMIT
            {
                suggestions.low_confidence_samples.push(text.to_string());
            }
        }

        suggestions
    }
}
