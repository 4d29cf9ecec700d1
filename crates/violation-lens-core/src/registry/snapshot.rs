//! Immutable registry state
//!
//! A snapshot is published whole and never modified afterwards; a
//! classification holds one `Arc<RegistrySnapshot>` for its whole run.

use std::collections::BTreeMap;

use once_cell::sync::OnceCell;

use crate::category::{Category, CategoryDef};
use crate::text::Vocabulary;

#[derive(Debug)]
pub struct RegistrySnapshot {
    categories: BTreeMap<String, Category>,
    vocabulary: Vocabulary,
    is_custom: bool,
    generation: u64,
    // Built on first `current_patterns` call
    pattern_map: OnceCell<BTreeMap<String, Vec<String>>>,
}

impl RegistrySnapshot {
    pub(crate) fn new(
        categories: BTreeMap<String, Category>,
        vocabulary: Vocabulary,
        is_custom: bool,
        generation: u64,
    ) -> Self {
        Self {
            categories,
            vocabulary,
            is_custom,
            generation,
            pattern_map: OnceCell::new(),
        }
    }

    /// Categories in name order
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Whether the rule set differs from the builtin default
    pub fn is_custom(&self) -> bool {
        self.is_custom
    }

    /// Monotonic id of this snapshot within its registry
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Category name -> pattern sources, in definition order
    pub fn pattern_map(&self) -> &BTreeMap<String, Vec<String>> {
        self.pattern_map.get_or_init(|| {
            self.categories
                .iter()
                .map(|(name, cat)| (name.clone(), cat.pattern_sources()))
                .collect()
        })
    }

    pub fn descriptions(&self) -> BTreeMap<String, String> {
        self.categories
            .iter()
            .map(|(name, cat)| (name.clone(), cat.description().to_string()))
            .collect()
    }

    pub fn to_defs(&self) -> Vec<CategoryDef> {
        self.categories.values().map(Category::to_def).collect()
    }

    pub(crate) fn category_map(&self) -> &BTreeMap<String, Category> {
        &self.categories
    }
}
