//! Word boundaries for space-delimited scripts
//!
//! ASCII terms only count as whole words, so `win` never hits inside
//! `window`. Other terms (CJK and the like) have no word separators and
//! match as plain substrings.

/// Whether `term` must stand as a whole word
pub fn needs_boundary(term: &str) -> bool {
    term.is_ascii()
}

/// `text[start..end]` is not glued to a word character on either side
pub fn is_standalone(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Occurrence of `term` in `text`, whole-word for ASCII terms
pub fn contains_term(text: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    if !needs_boundary(term) {
        return text.contains(term);
    }
    text.match_indices(term)
        .any(|(start, hit)| is_standalone(text, start, start + hit.len()))
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
