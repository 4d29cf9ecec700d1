//! Vocabulary and tokenization for the keyword pass.

pub(crate) mod boundary;
mod tokenizer;
mod vocabulary;

pub use tokenizer::{DictionaryTokenizer, TokenizeError, Tokenizer};
pub use vocabulary::{Vocabulary, BUILTIN_TERMS};
