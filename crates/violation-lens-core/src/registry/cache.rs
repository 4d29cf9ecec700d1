//! Classification result cache
//!
//! Keyed by the SHA-256 of the exact input text. Entries belong to one
//! snapshot generation; `clear` purges everything and moves to the next
//! generation, so a classification that started under an older snapshot
//! cannot repopulate the cache with stale results.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Default)]
struct CacheState {
    generation: u64,
    entries: HashMap<String, Vec<String>>,
}

#[derive(Debug)]
pub struct ResultCache {
    enabled: bool,
    state: Mutex<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

impl ResultCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            state: Mutex::new(CacheState::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn key(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Cached categories for `text` under snapshot `generation`
    pub fn get(&self, text: &str, generation: u64) -> Option<Vec<String>> {
        if !self.enabled {
            return None;
        }

        let state = self.lock();
        let found = if state.generation == generation {
            state.entries.get(&Self::key(text)).cloned()
        } else {
            None
        };

        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Store a result; dropped if `generation` is no longer current.
    pub fn insert(&self, text: &str, generation: u64, categories: Vec<String>) {
        if !self.enabled {
            return;
        }

        let mut state = self.lock();
        if state.generation == generation {
            state.entries.insert(Self::key(text), categories);
        }
    }

    /// Purge every entry and accept only results of `generation` from now on.
    pub fn clear(&self, generation: u64) {
        let mut state = self.lock();
        state.entries.clear();
        state.generation = generation;
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let attempts = (hits + misses).max(1);
        CacheStats {
            enabled: self.enabled,
            size: self.len(),
            hits,
            misses,
            hit_rate: hits as f64 / attempts as f64,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(true)
    }
}
