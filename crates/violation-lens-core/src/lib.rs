pub mod analysis;
pub mod category;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod persistence;
pub mod registry;
pub mod text;

pub use config::Config;
pub use engine::{EngineOptions, ViolationEngine};
pub use error::{ErrorKind, Result, ViolationError};

pub use analysis::{MatchResult, Suggestions, ViolationDetail, ViolationStatistics};
pub use matcher::{
    GapMatcher, KeywordMatcher, MatchInput, Matcher, MultiStageMatcher, PassResult, RegexMatcher,
};
pub use persistence::{load_patterns, save_patterns, PatternFile, RuleSetFormat};
pub use registry::{CacheStats, PatternInfo, PatternRegistry, RegistrySnapshot, ResultCache};
pub use text::{DictionaryTokenizer, TokenizeError, Tokenizer, Vocabulary};

// Category system
pub use category::{BuiltinCategory, Category, CategoryDef, Pattern, BUILTIN_CATEGORIES};
