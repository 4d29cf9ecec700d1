use crate::category::Category;
use crate::error::Result;

use super::{MatchInput, Matcher};

/// Every pattern against the raw text; first hit wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexMatcher;

impl Matcher for RegexMatcher {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn matches(&self, input: &MatchInput<'_>, category: &Category) -> Result<bool> {
        Ok(category.patterns().iter().any(|p| p.is_match(input.text())))
    }
}
