//! Classification engine
//!
//! Ties the registry, the multi-stage matcher and the result cache
//! together, and exposes the rule-management surface used by front ends.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;

use crate::analysis::{
    confidence, extract_evidence, MatchResult, Suggestions, ViolationDetail, ViolationStatistics,
};
use crate::category::CategoryDef;
use crate::error::Result;
use crate::matcher::MultiStageMatcher;
use crate::persistence;
use crate::registry::{CacheStats, PatternInfo, PatternRegistry, RegistrySnapshot, ResultCache};

/// Engine construction options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub cache_enabled: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cache_enabled: true,
        }
    }
}

#[derive(Debug)]
pub struct ViolationEngine {
    registry: PatternRegistry,
    matcher: MultiStageMatcher,
}

impl ViolationEngine {
    /// Builtin rule set, default matcher, cache enabled
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            registry: PatternRegistry::with_cache(ResultCache::new(options.cache_enabled)),
            matcher: MultiStageMatcher::new(),
        }
    }

    /// Swap the matching strategies
    pub fn with_matcher(mut self, matcher: MultiStageMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn matcher(&self) -> &MultiStageMatcher {
        &self.matcher
    }

    // ------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------

    /// Sorted category names for `text`. Blank text yields none.
    pub fn classify(&self, text: &str) -> Vec<String> {
        self.classify_in(&self.registry.snapshot(), text)
    }

    /// Categories plus confidence and evidence per category
    pub fn classify_with_details(&self, text: &str) -> MatchResult {
        let snapshot = self.registry.snapshot();
        let categories = self.classify_in(&snapshot, text);

        let details = categories
            .iter()
            .filter_map(|name| snapshot.get(name))
            .map(|category| ViolationDetail {
                category: category.name().to_string(),
                description: category.description().to_string(),
                count: 1,
                confidence: confidence(category, text),
                evidence: extract_evidence(category, text),
            })
            .collect();

        MatchResult {
            categories,
            details,
        }
    }

    /// Per-category and per-pattern counts over `texts`
    pub fn statistics<S: AsRef<str>>(&self, texts: &[S]) -> ViolationStatistics {
        let snapshot = self.registry.snapshot();
        ViolationStatistics::collect(texts, &snapshot, |text| self.classify_in(&snapshot, text))
    }

    /// Low-confidence and unmatched samples from `texts`
    pub fn suggest_improvements<S: AsRef<str>>(&self, texts: &[S]) -> Suggestions {
        Suggestions::collect(texts, |text| self.classify_with_details(text))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.registry.cache().stats()
    }

    fn classify_in(&self, snapshot: &RegistrySnapshot, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let cache = self.registry.cache();
        if let Some(categories) = cache.get(text, snapshot.generation()) {
            return categories;
        }

        let categories: Vec<String> = self
            .matcher
            .match_categories(text, snapshot)
            .into_iter()
            .collect();
        cache.insert(text, snapshot.generation(), categories.clone());

        debug!(
            "Classified '{}' -> {:?}",
            text.chars().take(50).collect::<String>(),
            categories
        );
        categories
    }

    // ------------------------------------------------------------------
    // Rule management
    // ------------------------------------------------------------------

    pub fn set_custom_patterns(&self, patterns: &BTreeMap<String, Vec<String>>) -> Result<()> {
        self.registry.set_patterns(patterns).map(|_| ())
    }

    pub fn add_violation_type(
        &self,
        name: &str,
        patterns: Vec<String>,
        description: Option<&str>,
    ) -> Result<()> {
        let mut def = CategoryDef::new(name, patterns);
        def.description = description.map(str::to_string);
        self.registry.add_category(def)
    }

    /// Like [`Self::add_violation_type`], with explicit keywords
    pub fn add_violation_def(&self, def: CategoryDef) -> Result<()> {
        self.registry.add_category(def)
    }

    pub fn remove_violation_type(&self, name: &str) -> Result<()> {
        self.registry.remove_category(name)
    }

    pub fn update_violation_patterns(&self, name: &str, patterns: Vec<String>) -> Result<()> {
        self.registry.update_patterns(name, patterns)
    }

    pub fn reset_to_default_patterns(&self) {
        self.registry.reset_to_default()
    }

    pub fn current_patterns(&self) -> BTreeMap<String, Vec<String>> {
        self.registry.current_patterns()
    }

    pub fn pattern_info(&self) -> PatternInfo {
        self.registry.pattern_info()
    }

    pub fn save_patterns(&self, path: &Path) -> Result<()> {
        persistence::save_patterns(&self.registry, path)
    }

    pub fn load_patterns(&self, path: &Path) -> Result<()> {
        persistence::load_patterns(&self.registry, path).map(|_| ())
    }
}

impl Default for ViolationEngine {
    fn default() -> Self {
        Self::new()
    }
}
