//! # Multi-stage matching
//!
//! Three independent strategies run over every category and their results
//! are unioned: a category is matched as soon as any one strategy reports it.
//!
//! | Strategy  | Looks at                                   |
//! |-----------|--------------------------------------------|
//! | `regex`   | every pattern, raw text                    |
//! | `keyword` | derived/explicit keywords, tokens + text   |
//! | `gap`     | gap patterns (`a.*?b`) only, raw text      |

mod gap_pass;
mod keyword_pass;
mod regex_pass;

use std::collections::{BTreeSet, HashSet};
use std::fmt::Debug;

use log::warn;

use crate::category::Category;
use crate::error::Result;
use crate::registry::RegistrySnapshot;
use crate::text::{DictionaryTokenizer, Tokenizer, Vocabulary};

pub use gap_pass::GapMatcher;
pub use keyword_pass::KeywordMatcher;
pub use regex_pass::RegexMatcher;

/// Text prepared once per classification and shared by every strategy
#[derive(Debug)]
pub struct MatchInput<'a> {
    text: &'a str,
    lowered: String,
    tokens: Option<HashSet<String>>,
}

impl<'a> MatchInput<'a> {
    /// Tokenization failure is not fatal: `tokens` is left empty and the
    /// keyword strategy falls back to substring checks.
    pub fn new(text: &'a str, vocabulary: &Vocabulary, tokenizer: &dyn Tokenizer) -> Self {
        let tokens = match tokenizer.tokenize(text, vocabulary) {
            Ok(tokens) => Some(tokens.into_iter().collect()),
            Err(e) => {
                warn!("Tokenization failed, using substring matching only: {}", e);
                None
            }
        };

        Self {
            text,
            lowered: text.to_lowercase(),
            tokens,
        }
    }

    pub fn text(&self) -> &str {
        self.text
    }

    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    pub fn tokens(&self) -> Option<&HashSet<String>> {
        self.tokens.as_ref()
    }
}

/// One matching strategy
pub trait Matcher: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether `category` applies to the input.
    ///
    /// An error only affects this (strategy, category) pair.
    fn matches(&self, input: &MatchInput<'_>, category: &Category) -> Result<bool>;
}

/// Categories found by one strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassResult {
    pub strategy: &'static str,
    pub categories: BTreeSet<String>,
}

#[derive(Debug)]
pub struct MultiStageMatcher {
    strategies: Vec<Box<dyn Matcher>>,
    tokenizer: Box<dyn Tokenizer>,
}

impl MultiStageMatcher {
    /// Regex, keyword and gap strategies with the dictionary tokenizer
    pub fn new() -> Self {
        Self::with_tokenizer(Box::new(DictionaryTokenizer))
    }

    pub fn with_tokenizer(tokenizer: Box<dyn Tokenizer>) -> Self {
        Self {
            strategies: vec![
                Box::new(RegexMatcher),
                Box::new(KeywordMatcher),
                Box::new(GapMatcher),
            ],
            tokenizer,
        }
    }

    /// No strategies; add them with [`MultiStageMatcher::with_strategy`].
    pub fn empty(tokenizer: Box<dyn Tokenizer>) -> Self {
        Self {
            strategies: Vec::new(),
            tokenizer,
        }
    }

    pub fn with_strategy(mut self, strategy: Box<dyn Matcher>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Union of all passes. Blank text matches nothing.
    pub fn match_categories(&self, text: &str, snapshot: &RegistrySnapshot) -> BTreeSet<String> {
        self.run_passes(text, snapshot)
            .into_iter()
            .flat_map(|pass| pass.categories)
            .collect()
    }

    /// Run every strategy separately
    pub fn run_passes(&self, text: &str, snapshot: &RegistrySnapshot) -> Vec<PassResult> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let input = MatchInput::new(text, snapshot.vocabulary(), self.tokenizer.as_ref());

        self.strategies
            .iter()
            .map(|strategy| PassResult {
                strategy: strategy.name(),
                categories: snapshot
                    .categories()
                    .filter(|category| match strategy.matches(&input, category) {
                        Ok(matched) => matched,
                        Err(e) => {
                            warn!("Skipping {} for {}: {}", strategy.name(), category.name(), e);
                            false
                        }
                    })
                    .map(|category| category.name().to_string())
                    .collect(),
            })
            .collect()
    }
}

impl Default for MultiStageMatcher {
    fn default() -> Self {
        Self::new()
    }
}
