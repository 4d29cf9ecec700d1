//! # Category Module
//!
//! Violation categories and the patterns backing them.
//!
//! - `builtin`: the default rule set and the uncompiled [`CategoryDef`]
//! - `compiled`: validated [`Category`] / [`Pattern`] and keyword derivation
//!
//! ```rust
//! use violation_lens_core::category::{Category, CategoryDef};
//!
//! let def = CategoryDef::new("fraud", vec!["win.*?prize".to_string()]);
//! let category = Category::compile(&def, true).unwrap();
//! assert!(category.keywords().contains("prize"));
//! ```

mod builtin;
mod compiled;

pub use builtin::{
    builtin, default_description, BuiltinCategory, CategoryDef, BUILTIN_CATEGORIES,
    UNKNOWN_DESCRIPTION,
};
pub use compiled::{
    derive_fragments, Category, Pattern, COMMON_WORDS, GAP_TOKEN, MIN_FRAGMENT_CHARS,
};
