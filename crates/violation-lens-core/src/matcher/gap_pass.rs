use crate::category::Category;
use crate::error::Result;

use super::{MatchInput, Matcher};

/// Only the category's gap patterns (`a.*?b`) against the raw text.
#[derive(Debug, Clone, Copy, Default)]
pub struct GapMatcher;

impl Matcher for GapMatcher {
    fn name(&self) -> &'static str {
        "gap"
    }

    fn matches(&self, input: &MatchInput<'_>, category: &Category) -> Result<bool> {
        Ok(category.gap_patterns().any(|p| p.is_match(input.text())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryDef;
    use crate::text::{DictionaryTokenizer, Vocabulary};

    #[test]
    fn test_fixed_phrases_are_ignored() {
        let def = CategoryDef::new("ads", vec!["buy now".into(), "limited.*?offer".into()]);
        let category = Category::compile(&def, true).unwrap();
        let vocab = Vocabulary::build([&category]);

        let input = MatchInput::new("buy now", &vocab, &DictionaryTokenizer);
        assert!(!GapMatcher.matches(&input, &category).unwrap());

        let input = MatchInput::new("Limited time offer", &vocab, &DictionaryTokenizer);
        assert!(GapMatcher.matches(&input, &category).unwrap());
    }
}
