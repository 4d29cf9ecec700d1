//! Text segmentation
//!
//! Vocabulary terms are emitted as single tokens (leftmost-longest);
//! the text between them falls back to Unicode word boundaries.

use std::fmt::Debug;

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

use super::boundary::{is_standalone, needs_boundary};
use super::vocabulary::Vocabulary;

#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("vocabulary automaton unavailable ({terms} terms)")]
    AutomatonUnavailable { terms: usize },

    #[error("tokenizer failed: {0}")]
    Other(String),
}

/// Segmentation strategy used by the keyword pass
pub trait Tokenizer: Debug + Send + Sync {
    /// Lowercased tokens of `text`
    fn tokenize(&self, text: &str, vocabulary: &Vocabulary) -> Result<Vec<String>, TokenizeError>;
}

/// Dictionary-biased tokenizer
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryTokenizer;

impl Tokenizer for DictionaryTokenizer {
    fn tokenize(&self, text: &str, vocabulary: &Vocabulary) -> Result<Vec<String>, TokenizeError> {
        let lowered = text.to_lowercase();

        let automaton = match vocabulary.automaton() {
            Some(automaton) => automaton,
            None if vocabulary.is_empty() => return Ok(unicode_words(&lowered).collect()),
            None => {
                return Err(TokenizeError::AutomatonUnavailable {
                    terms: vocabulary.len(),
                })
            }
        };

        let mut tokens = Vec::new();
        let mut last = 0;
        for mat in automaton.find_iter(&lowered) {
            let term = &lowered[mat.start()..mat.end()];
            if needs_boundary(term) && !is_standalone(&lowered, mat.start(), mat.end()) {
                continue;
            }
            tokens.extend(unicode_words(&lowered[last..mat.start()]));
            tokens.push(term.to_string());
            last = mat.end();
        }
        tokens.extend(unicode_words(&lowered[last..]));

        Ok(tokens)
    }
}

fn unicode_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.unicode_words().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, CategoryDef};

    fn vocabulary(patterns: &[&str]) -> Vocabulary {
        let def = CategoryDef::new("test", patterns.iter().map(|p| p.to_string()).collect());
        Vocabulary::build([&Category::compile(&def, true).unwrap()])
    }

    #[test]
    fn test_vocabulary_terms_stay_whole() {
        let vocab = vocabulary(&["限时秒杀"]);
        let tokens = DictionaryTokenizer.tokenize("独家秘籍！限时秒杀！", &vocab).unwrap();
        assert!(tokens.contains(&"限时秒杀".to_string()), "{:?}", tokens);
    }

    #[test]
    fn test_plain_words_are_lowercased() {
        let vocab = vocabulary(&["lottery"]);
        let tokens = DictionaryTokenizer
            .tokenize("Claim your LOTTERY winnings now", &vocab)
            .unwrap();
        assert_eq!(tokens, vec!["claim", "your", "lottery", "winnings", "now"]);
    }

    #[test]
    fn test_longest_term_wins() {
        let vocab = vocabulary(&["恐怖", "恐怖组织"]);
        let tokens = DictionaryTokenizer.tokenize("某恐怖组织", &vocab).unwrap();
        assert!(tokens.contains(&"恐怖组织".to_string()), "{:?}", tokens);
        assert!(!tokens.contains(&"恐怖".to_string()), "{:?}", tokens);
    }

    #[test]
    fn test_ascii_term_inside_word_is_not_a_token() {
        let vocab = vocabulary(&["prize"]);
        let tokens = DictionaryTokenizer
            .tokenize("The prizefighter won a prize", &vocab)
            .unwrap();
        assert_eq!(tokens, vec!["the", "prizefighter", "won", "a", "prize"]);
    }

    #[test]
    fn test_empty_text() {
        let vocab = vocabulary(&["foo"]);
        assert!(DictionaryTokenizer.tokenize("", &vocab).unwrap().is_empty());
    }
}
