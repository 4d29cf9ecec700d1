//! # Pattern Registry
//!
//! Owns the current [`RegistrySnapshot`] and the [`ResultCache`].
//!
//! Writers are serialized by a mutex. Each mutation validates a complete new
//! category map, builds its vocabulary, swaps the snapshot pointer and only
//! then clears the cache. A failed mutation leaves the published snapshot
//! untouched. Readers only take the read lock long enough to clone an `Arc`.

mod cache;
mod snapshot;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use log::{debug, info, warn};
use serde::Serialize;

use crate::category::{Category, CategoryDef, BUILTIN_CATEGORIES};
use crate::error::{Result, ViolationError};
use crate::text::Vocabulary;

pub use cache::{CacheStats, ResultCache};
pub use snapshot::RegistrySnapshot;

/// Registry metadata for the management surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternInfo {
    pub is_custom: bool,
    pub category_count: usize,
    pub pattern_counts: BTreeMap<String, usize>,
    pub cache_size: usize,
}

#[derive(Debug)]
pub struct PatternRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
    /// Held for the whole validate-then-swap sequence; guards the generation counter.
    writer: Mutex<u64>,
    cache: ResultCache,
}

impl PatternRegistry {
    /// Registry with the builtin rule set
    pub fn new() -> Self {
        Self::with_cache(ResultCache::default())
    }

    pub fn with_cache(cache: ResultCache) -> Self {
        let categories = default_categories();
        let vocabulary = Vocabulary::build(categories.values());
        let snapshot = RegistrySnapshot::new(categories, vocabulary, false, 0);

        Self {
            current: RwLock::new(Arc::new(snapshot)),
            writer: Mutex::new(0),
            cache,
        }
    }

    /// Current snapshot. Never observes a half-applied mutation.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Replace the whole rule set. All-or-nothing.
    pub fn set_patterns(
        &self,
        patterns: &BTreeMap<String, Vec<String>>,
    ) -> Result<Arc<RegistrySnapshot>> {
        let defs = patterns
            .iter()
            .map(|(name, patterns)| CategoryDef::new(name.clone(), patterns.clone()))
            .collect();
        self.replace_all(defs, true)
    }

    /// Replace the whole rule set from full definitions. All-or-nothing.
    pub fn replace_all(
        &self,
        defs: Vec<CategoryDef>,
        is_custom: bool,
    ) -> Result<Arc<RegistrySnapshot>> {
        let mut writer = self.lock_writer();

        let mut categories = BTreeMap::new();
        for def in &defs {
            let category = Category::compile(def, is_custom)?;
            let name = category.name().to_string();
            if categories.insert(name.clone(), category).is_some() {
                return Err(ViolationError::CategoryAlreadyExists { name });
            }
        }

        let vocabulary = Vocabulary::build(categories.values());
        let snapshot = self.publish(&mut writer, categories, vocabulary, is_custom);
        info!(
            "Replaced rule set: {} categories (custom: {})",
            snapshot.len(),
            is_custom
        );
        Ok(snapshot)
    }

    pub fn add_category(&self, def: CategoryDef) -> Result<()> {
        let mut writer = self.lock_writer();
        let current = self.snapshot();

        let category = Category::compile(&def, true)?;
        if current.contains(category.name()) {
            return Err(ViolationError::CategoryAlreadyExists {
                name: category.name().to_string(),
            });
        }

        let vocabulary = current.vocabulary().extended_with(&category);
        let name = category.name().to_string();
        let mut categories = current.category_map().clone();
        categories.insert(name.clone(), category);

        self.publish(&mut writer, categories, vocabulary, true);
        info!("Added category: {}", name);
        Ok(())
    }

    pub fn remove_category(&self, name: &str) -> Result<()> {
        let mut writer = self.lock_writer();
        let current = self.snapshot();

        let mut categories = current.category_map().clone();
        if categories.remove(name).is_none() {
            warn!("Cannot remove unknown category: {}", name);
            return Err(ViolationError::CategoryNotFound {
                name: name.to_string(),
            });
        }

        let vocabulary = Vocabulary::build(categories.values());
        self.publish(&mut writer, categories, vocabulary, true);
        info!("Removed category: {}", name);
        Ok(())
    }

    pub fn update_patterns(&self, name: &str, patterns: Vec<String>) -> Result<()> {
        let mut writer = self.lock_writer();
        let current = self.snapshot();

        let Some(existing) = current.get(name) else {
            warn!("Cannot update unknown category: {}", name);
            return Err(ViolationError::CategoryNotFound {
                name: name.to_string(),
            });
        };

        let updated = existing.with_patterns(patterns)?;
        let mut categories = current.category_map().clone();
        categories.insert(name.to_string(), updated);

        let vocabulary = Vocabulary::build(categories.values());
        self.publish(&mut writer, categories, vocabulary, true);
        info!("Updated patterns of category: {}", name);
        Ok(())
    }

    /// Restore the builtin rule set. Never fails.
    pub fn reset_to_default(&self) {
        let mut writer = self.lock_writer();
        let categories = default_categories();
        let vocabulary = Vocabulary::build(categories.values());
        self.publish(&mut writer, categories, vocabulary, false);
        info!("Reset rule set to defaults");
    }

    pub fn current_patterns(&self) -> BTreeMap<String, Vec<String>> {
        self.snapshot().pattern_map().clone()
    }

    pub fn pattern_info(&self) -> PatternInfo {
        let snapshot = self.snapshot();
        PatternInfo {
            is_custom: snapshot.is_custom(),
            category_count: snapshot.len(),
            pattern_counts: snapshot
                .categories()
                .map(|c| (c.name().to_string(), c.patterns().len()))
                .collect(),
            cache_size: self.cache.len(),
        }
    }

    fn lock_writer(&self) -> MutexGuard<'_, u64> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Caller must hold the writer lock.
    fn publish(
        &self,
        generation: &mut MutexGuard<'_, u64>,
        categories: BTreeMap<String, Category>,
        vocabulary: Vocabulary,
        is_custom: bool,
    ) -> Arc<RegistrySnapshot> {
        **generation += 1;
        let snapshot = Arc::new(RegistrySnapshot::new(
            categories,
            vocabulary,
            is_custom,
            **generation,
        ));

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);
        self.cache.clear(**generation);
        debug!("Published snapshot generation {}, cache cleared", **generation);

        snapshot
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn default_categories() -> BTreeMap<String, Category> {
    let mut categories = BTreeMap::new();
    for builtin in BUILTIN_CATEGORIES {
        match Category::compile(&CategoryDef::from(builtin), false) {
            Ok(category) => {
                categories.insert(builtin.name.to_string(), category);
            }
            Err(e) => warn!("Skipping builtin category {}: {}", builtin.name, e),
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn map(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(name, patterns)| {
                (
                    name.to_string(),
                    patterns.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_new_registry_has_builtin_categories() {
        let registry = PatternRegistry::new();
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), BUILTIN_CATEGORIES.len());
        assert!(!snapshot.is_custom());
        assert!(snapshot.contains("fraud"));
        assert!(snapshot.categories().all(|c| !c.is_custom()));
    }

    #[test]
    fn test_set_patterns_round_trip() {
        let registry = PatternRegistry::new();
        let patterns = map(&[("fraud", &["win.*?prize", "scam"]), ("abuse", &["idiot"])]);

        let snapshot = registry.set_patterns(&patterns).unwrap();
        assert!(snapshot.is_custom());
        assert_eq!(registry.current_patterns(), patterns);
    }

    #[test]
    fn test_set_patterns_is_atomic() {
        let registry = PatternRegistry::new();
        let before = registry.current_patterns();
        let generation = registry.snapshot().generation();

        let bad = map(&[("fraud", &["scam"]), ("broken", &["ok", "(unclosed"])]);
        let err = registry.set_patterns(&bad).unwrap_err();

        assert!(matches!(err, ViolationError::InvalidPattern { .. }));
        assert_eq!(registry.current_patterns(), before);
        assert_eq!(registry.snapshot().generation(), generation);
    }

    #[test]
    fn test_set_patterns_rejects_empty_list() {
        let registry = PatternRegistry::new();
        let err = registry.set_patterns(&map(&[("fraud", &[])])).unwrap_err();
        assert!(matches!(err, ViolationError::EmptyPatterns { .. }));
    }

    #[test]
    fn test_replace_all_rejects_duplicate_names() {
        let registry = PatternRegistry::new();
        let defs = vec![
            CategoryDef::new("fraud", vec!["a".into()]),
            CategoryDef::new("fraud", vec!["b".into()]),
        ];
        let err = registry.replace_all(defs, true).unwrap_err();
        assert!(matches!(err, ViolationError::CategoryAlreadyExists { .. }));
    }

    #[test]
    fn test_set_patterns_rejects_padded_name() {
        let registry = PatternRegistry::new();
        let before = registry.current_patterns();

        let err = registry
            .set_patterns(&map(&[(" fraud ", &["scam"])]))
            .unwrap_err();
        assert!(matches!(err, ViolationError::PaddedCategoryName { .. }));
        assert_eq!(registry.current_patterns(), before);
    }

    #[test]
    fn test_add_category() {
        let registry = PatternRegistry::new();
        registry
            .add_category(CategoryDef::new("custom_x", vec!["foo".into()]))
            .unwrap();

        let snapshot = registry.snapshot();
        let category = snapshot.get("custom_x").unwrap();
        assert!(category.is_custom());
        assert!(snapshot.is_custom());
        assert!(snapshot.vocabulary().contains("custom_x"));
        assert!(snapshot.vocabulary().contains("foo"));
    }

    #[test]
    fn test_add_category_failures_leave_registry_unchanged() {
        let registry = PatternRegistry::new();
        let before = registry.current_patterns();

        let err = registry
            .add_category(CategoryDef::new("fraud", vec!["x".into()]))
            .unwrap_err();
        assert!(matches!(err, ViolationError::CategoryAlreadyExists { .. }));

        let err = registry
            .add_category(CategoryDef::new("new", vec![]))
            .unwrap_err();
        assert!(matches!(err, ViolationError::EmptyPatterns { .. }));

        let err = registry
            .add_category(CategoryDef::new("new", vec!["[".into()]))
            .unwrap_err();
        assert!(matches!(err, ViolationError::InvalidPattern { .. }));

        assert_eq!(registry.current_patterns(), before);
        assert!(!registry.snapshot().is_custom());
    }

    #[test]
    fn test_remove_category() {
        let registry = PatternRegistry::new();
        registry.remove_category("fraud").unwrap();
        assert!(!registry.snapshot().contains("fraud"));

        let err = registry.remove_category("fraud").unwrap_err();
        assert!(matches!(err, ViolationError::CategoryNotFound { .. }));
    }

    #[test]
    fn test_update_patterns() {
        let registry = PatternRegistry::new();
        registry
            .update_patterns("fraud", vec!["jackpot".into()])
            .unwrap();
        assert_eq!(registry.current_patterns()["fraud"], vec!["jackpot"]);

        let err = registry
            .update_patterns("missing", vec!["x".into()])
            .unwrap_err();
        assert!(matches!(err, ViolationError::CategoryNotFound { .. }));

        let before = registry.current_patterns();
        let err = registry
            .update_patterns("fraud", vec!["(".into()])
            .unwrap_err();
        assert!(matches!(err, ViolationError::InvalidPattern { .. }));
        assert_eq!(registry.current_patterns(), before);
    }

    #[test]
    fn test_reset_to_default() {
        let registry = PatternRegistry::new();
        registry
            .add_category(CategoryDef::new("custom_x", vec!["foo".into()]))
            .unwrap();
        registry.reset_to_default();

        let snapshot = registry.snapshot();
        assert!(!snapshot.contains("custom_x"));
        assert!(!snapshot.is_custom());
        assert!(!registry.pattern_info().is_custom);
    }

    #[test]
    fn test_mutation_clears_cache() {
        let registry = PatternRegistry::new();
        let generation = registry.snapshot().generation();
        registry
            .cache()
            .insert("text", generation, vec!["fraud".into()]);
        assert_eq!(registry.pattern_info().cache_size, 1);

        registry.remove_category("abuse").unwrap();
        assert_eq!(registry.pattern_info().cache_size, 0);
    }

    #[test]
    fn test_old_snapshot_survives_mutation() {
        let registry = PatternRegistry::new();
        let old = registry.snapshot();
        registry.remove_category("fraud").unwrap();

        assert!(old.contains("fraud"));
        assert!(!registry.snapshot().contains("fraud"));
        assert!(registry.snapshot().generation() > old.generation());
    }

    #[test]
    fn test_pattern_info() {
        let registry = PatternRegistry::new();
        registry
            .set_patterns(&map(&[("a", &["x", "y"]), ("b", &["z"])]))
            .unwrap();

        let info = registry.pattern_info();
        assert!(info.is_custom);
        assert_eq!(info.category_count, 2);
        assert_eq!(info.pattern_counts["a"], 2);
        assert_eq!(info.pattern_counts["b"], 1);
        assert_eq!(info.cache_size, 0);
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_updates() {
        let registry = Arc::new(PatternRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry
                        .add_category(CategoryDef::new(
                            format!("custom_{}", i),
                            vec![format!("term{}", i)],
                        ))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), BUILTIN_CATEGORIES.len() + 8);
        assert_eq!(snapshot.generation(), 8);
    }

    fn pattern_map_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<String>>> {
        prop::collection::btree_map(
            "[a-z][a-z_]{0,8}",
            prop::collection::vec("[a-z]{1,6}(\\.\\*\\?[a-z]{1,6})?", 1..4),
            1..6,
        )
    }

    proptest! {
        #[test]
        fn prop_set_patterns_round_trip(patterns in pattern_map_strategy()) {
            let registry = PatternRegistry::new();
            registry.set_patterns(&patterns).unwrap();
            prop_assert_eq!(registry.current_patterns(), patterns);
        }

        #[test]
        fn prop_invalid_pattern_is_atomic(
            patterns in pattern_map_strategy(),
            valid in pattern_map_strategy(),
        ) {
            let registry = PatternRegistry::new();
            registry.set_patterns(&valid).unwrap();
            let before = registry.current_patterns();

            let mut bad = patterns;
            bad.insert("zz_broken".to_string(), vec!["ok".to_string(), "(".to_string()]);
            prop_assert!(registry.set_patterns(&bad).is_err());
            prop_assert_eq!(registry.current_patterns(), before);
        }
    }
}
