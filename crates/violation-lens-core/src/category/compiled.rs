//! Compiled categories
//!
//! A [`Category`] only exists once every one of its patterns has compiled,
//! so a registry holding categories can never hold an invalid pattern.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};

use crate::error::{Result, ViolationError};

use super::builtin::{default_description, CategoryDef};

/// Marks a gap pattern ("term A ... later ... term B").
pub const GAP_TOKEN: &str = ".*?";

/// Minimum length (in chars) of a keyword derived from a pattern
pub const MIN_FRAGMENT_CHARS: usize = 2;

const REGEX_META: &[char] = &['.', '*', '+', '?', '(', ')', '|', '^', '$'];
const SEPARATORS: &[char] = &[',', ';', ':', '/', '、', '，', '；', '：', '。'];

/// Everyday English words never used alone as derived keywords
pub const COMMON_WORDS: &[&str] = &[
    "a", "about", "after", "against", "all", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "buy", "by", "can", "come", "do", "down", "for", "free", "from", "get", "give", "go",
    "got", "he", "her", "here", "his", "how", "in", "into", "is", "it", "its", "just", "make",
    "me", "more", "my", "new", "no", "not", "now", "of", "off", "on", "or", "our", "out", "over",
    "sell", "she", "so", "some", "take", "than", "that", "the", "their", "them", "then", "there",
    "they", "this", "to", "up", "us", "very", "was", "we", "were", "what", "when", "will", "win",
    "with", "won", "you", "your",
];

/// A validated, case-insensitive regular expression
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    is_gap: bool,
}

impl Pattern {
    pub fn compile(category: &str, source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Err(ViolationError::EmptyPattern {
                category: category.to_string(),
            });
        }

        let regex = RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .map_err(|e| ViolationError::InvalidPattern {
                category: category.to_string(),
                pattern: source.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            source: source.to_string(),
            regex,
            is_gap: source.contains(GAP_TOKEN),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn is_gap(&self) -> bool {
        self.is_gap
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// A named violation class backed by compiled patterns
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    patterns: Vec<Pattern>,
    keywords: BTreeSet<String>,
    explicit_keywords: BTreeSet<String>,
    description: String,
    is_custom: bool,
}

impl Category {
    /// Validate and compile a definition. Fails on the first bad pattern.
    ///
    /// Names are stored verbatim, so padded names are rejected rather than
    /// trimmed.
    pub fn compile(def: &CategoryDef, is_custom: bool) -> Result<Self> {
        let name = def.name.as_str();
        if name.trim().is_empty() {
            return Err(ViolationError::EmptyCategoryName);
        }
        if name.trim() != name {
            return Err(ViolationError::PaddedCategoryName {
                name: name.to_string(),
            });
        }
        if def.patterns.is_empty() {
            return Err(ViolationError::EmptyPatterns {
                category: name.to_string(),
            });
        }

        let patterns = def
            .patterns
            .iter()
            .map(|p| Pattern::compile(name, p))
            .collect::<Result<Vec<_>>>()?;

        let explicit_keywords: BTreeSet<String> = def
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        let mut keywords: BTreeSet<String> = patterns
            .iter()
            .flat_map(|p| derive_fragments(p.source()))
            .collect();
        keywords.extend(explicit_keywords.iter().cloned());

        let description = def
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| default_description(name).to_string());

        Ok(Self {
            name: name.to_string(),
            patterns,
            keywords,
            explicit_keywords,
            description,
            is_custom,
        })
    }

    /// Same category with a new pattern list; keywords are re-derived.
    pub fn with_patterns(&self, patterns: Vec<String>) -> Result<Self> {
        let def = CategoryDef {
            patterns,
            ..self.to_def()
        };
        Self::compile(&def, true)
    }

    /// Uncompiled form, carrying only the explicitly supplied keywords
    pub fn to_def(&self) -> CategoryDef {
        CategoryDef {
            name: self.name.clone(),
            patterns: self.pattern_sources(),
            keywords: self.explicit_keywords.iter().cloned().collect(),
            description: Some(self.description.clone()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn gap_patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter().filter(|p| p.is_gap())
    }

    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_custom(&self) -> bool {
        self.is_custom
    }

    pub fn pattern_sources(&self) -> Vec<String> {
        self.patterns.iter().map(|p| p.source.clone()).collect()
    }

    /// Count patterns that match `text` anywhere
    pub fn matched_pattern_count(&self, text: &str) -> usize {
        self.patterns.iter().filter(|p| p.is_match(text)).count()
    }
}

/// Split a pattern into literal fragments usable as keywords.
///
/// Metacharacters, escapes, character classes and counted repetitions all
/// act as separators. Spaces inside a literal run are kept, so `adult dating`
/// stays one phrase. Fragments shorter than [`MIN_FRAGMENT_CHARS`] and lone
/// [`COMMON_WORDS`] are dropped.
pub fn derive_fragments(source: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut chars = source.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
                flush(&mut current, &mut fragments);
            }
            '[' => {
                skip_until(&mut chars, ']');
                flush(&mut current, &mut fragments);
            }
            '{' => {
                skip_until(&mut chars, '}');
                flush(&mut current, &mut fragments);
            }
            c if c.is_whitespace() => {
                if !current.is_empty() && !current.ends_with(' ') {
                    current.push(' ');
                }
            }
            c if REGEX_META.contains(&c) || SEPARATORS.contains(&c) => {
                flush(&mut current, &mut fragments);
            }
            c => current.extend(c.to_lowercase()),
        }
    }
    flush(&mut current, &mut fragments);

    fragments
}

fn skip_until(chars: &mut std::str::Chars<'_>, end: char) {
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == end {
            break;
        }
    }
}

fn flush(current: &mut String, fragments: &mut Vec<String>) {
    let fragment = current.trim_end();
    if fragment.chars().count() >= MIN_FRAGMENT_CHARS && !COMMON_WORDS.contains(&fragment) {
        fragments.push(fragment.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_compile_case_insensitive() {
        let pattern = Pattern::compile("fraud", "Scam").unwrap();
        assert!(pattern.is_match("this is a SCAM"));
        assert!(!pattern.is_gap());
    }

    #[test]
    fn test_pattern_gap_detection() {
        assert!(Pattern::compile("fraud", "win.*?prize").unwrap().is_gap());
        assert!(!Pattern::compile("fraud", "win.*prize").unwrap().is_gap());
    }

    #[test]
    fn test_pattern_invalid() {
        let err = Pattern::compile("fraud", "win(").unwrap_err();
        assert!(matches!(err, ViolationError::InvalidPattern { .. }));
    }

    #[test]
    fn test_pattern_empty() {
        let err = Pattern::compile("fraud", "  ").unwrap_err();
        assert!(matches!(err, ViolationError::EmptyPattern { .. }));
    }

    #[test]
    fn test_category_rejects_empty_name_and_patterns() {
        let err = Category::compile(&CategoryDef::new(" ", vec!["a".into()]), true).unwrap_err();
        assert!(matches!(err, ViolationError::EmptyCategoryName));

        let err = Category::compile(&CategoryDef::new("x", vec![]), true).unwrap_err();
        assert!(matches!(err, ViolationError::EmptyPatterns { .. }));
    }

    #[test]
    fn test_category_rejects_padded_name() {
        let err = Category::compile(&CategoryDef::new(" fraud ", vec!["scam".into()]), true)
            .unwrap_err();
        assert!(
            matches!(err, ViolationError::PaddedCategoryName { ref name } if name == " fraud ")
        );
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    }

    #[test]
    fn test_category_keywords_merge_explicit_and_derived() {
        let def = CategoryDef::new("fraud", vec!["win.*?prize".into()])
            .with_keywords(vec!["Lottery".into()]);
        let category = Category::compile(&def, true).unwrap();

        let keywords: Vec<&str> = category.keywords().iter().map(|s| s.as_str()).collect();
        assert_eq!(keywords, vec!["lottery", "prize"]);
        assert_eq!(category.gap_patterns().count(), 1);
    }

    #[test]
    fn test_with_patterns_rederives_keywords() {
        let def = CategoryDef::new("fraud", vec!["win.*?prize".into()])
            .with_keywords(vec!["lottery".into()])
            .with_description("Scams");
        let category = Category::compile(&def, false).unwrap();
        let updated = category.with_patterns(vec!["jackpot".into()]).unwrap();

        assert!(updated.is_custom());
        assert_eq!(updated.description(), "Scams");
        assert!(updated.keywords().contains("jackpot"));
        assert!(updated.keywords().contains("lottery"));
        assert!(!updated.keywords().contains("prize"));
        assert_eq!(updated.to_def().keywords, vec!["lottery".to_string()]);
    }

    #[test]
    fn test_category_description_fallback() {
        let custom = Category::compile(&CategoryDef::new("custom_x", vec!["foo".into()]), true)
            .unwrap();
        assert_eq!(custom.description(), "Unknown violation type");

        let described = CategoryDef::new("custom_y", vec!["foo".into()]).with_description("Mine");
        assert_eq!(Category::compile(&described, true).unwrap().description(), "Mine");
    }

    #[test]
    fn test_derive_fragments_strips_metacharacters() {
        assert_eq!(derive_fragments("jackpot.*?prize"), vec!["jackpot", "prize"]);
        assert_eq!(derive_fragments(r"foo\d{3}bar"), vec!["foo", "bar"]);
        assert_eq!(derive_fragments("drugs? for  sale"), vec!["drugs", "for sale"]);
        assert_eq!(derive_fragments("extremis[tm]"), vec!["extremis"]);
        assert_eq!(derive_fragments("中奖.*?万"), vec!["中奖"]);
        assert!(derive_fragments("涉.*?黄").is_empty());
    }

    #[test]
    fn test_derive_fragments_drops_common_words() {
        assert_eq!(derive_fragments("win.*?prize"), vec!["prize"]);
        assert_eq!(derive_fragments("make.*?(now|up)"), Vec::<String>::new());
        assert_eq!(derive_fragments("rise (up)"), vec!["rise"]);
        assert_eq!(derive_fragments("adult dating "), vec!["adult dating"]);
    }

    #[test]
    fn test_matched_pattern_count() {
        let def = CategoryDef::new("abuse", vec!["idiot".into(), "fool".into(), "jerk".into()]);
        let category = Category::compile(&def, false).unwrap();
        assert_eq!(category.matched_pattern_count("idiot and fool"), 2);
        assert_eq!(category.matched_pattern_count("polite"), 0);
    }
}
