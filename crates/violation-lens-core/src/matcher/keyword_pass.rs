use crate::category::Category;
use crate::error::Result;
use crate::text::boundary::contains_term;

use super::{MatchInput, Matcher};

/// A keyword hits if it is a token of the text or occurs in the lowercased
/// text. ASCII keywords must occur as whole words. Without tokens only the
/// occurrence check applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMatcher;

impl Matcher for KeywordMatcher {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn matches(&self, input: &MatchInput<'_>, category: &Category) -> Result<bool> {
        let tokens = input.tokens();
        Ok(category.keywords().iter().any(|keyword| {
            tokens.is_some_and(|t| t.contains(keyword)) || contains_term(input.lowered(), keyword)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryDef;
    use crate::text::{DictionaryTokenizer, Vocabulary};

    fn fraud() -> Category {
        let def = CategoryDef::new("fraud", vec!["中奖.*?万".into()])
            .with_keywords(vec!["Lottery".into()]);
        Category::compile(&def, true).unwrap()
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let category = fraud();
        let vocab = Vocabulary::build([&category]);
        let input = MatchInput::new("Claim your LOTTERY winnings", &vocab, &DictionaryTokenizer);
        assert!(KeywordMatcher.matches(&input, &category).unwrap());
    }

    #[test]
    fn test_derived_keyword_from_gap_pattern() {
        let category = fraud();
        let vocab = Vocabulary::build([&category]);
        let input = MatchInput::new("恭喜中奖", &vocab, &DictionaryTokenizer);
        assert!(KeywordMatcher.matches(&input, &category).unwrap());
    }

    #[test]
    fn test_keyword_inside_longer_word_is_ignored() {
        let def = CategoryDef::new("fraud", vec!["scam".into()])
            .with_keywords(vec!["win".into(), "flash sale".into()]);
        let category = Category::compile(&def, true).unwrap();
        let vocab = Vocabulary::build([&category]);

        for text in ["Please update the window", "Twin flash salesmen"] {
            let input = MatchInput::new(text, &vocab, &DictionaryTokenizer);
            assert!(!KeywordMatcher.matches(&input, &category).unwrap(), "{}", text);
        }
        let input = MatchInput::new("Huge FLASH SALE, you win", &vocab, &DictionaryTokenizer);
        assert!(KeywordMatcher.matches(&input, &category).unwrap());
    }

    #[test]
    fn test_no_keyword() {
        let category = fraud();
        let vocab = Vocabulary::build([&category]);
        let input = MatchInput::new("nothing to see", &vocab, &DictionaryTokenizer);
        assert!(!KeywordMatcher.matches(&input, &category).unwrap());
    }
}
