//! Evidence windows around pattern hits

use crate::category::Category;

/// Characters of context kept on each side of a hit
pub const CONTEXT_CHARS: usize = 20;
/// Maximum number of windows per category
pub const MAX_WINDOWS: usize = 3;
pub const EVIDENCE_DELIMITER: &str = " | ";

/// Up to [`MAX_WINDOWS`] distinct context windows, joined by
/// [`EVIDENCE_DELIMITER`]. Empty when no pattern hits the text.
pub fn extract_evidence(category: &Category, text: &str) -> String {
    let mut windows: Vec<&str> = Vec::new();

    'patterns: for pattern in category.patterns() {
        for mat in pattern.regex().find_iter(text) {
            let window = context_window(text, mat.start(), mat.end()).trim();
            if !window.is_empty() && !windows.contains(&window) {
                windows.push(window);
                if windows.len() == MAX_WINDOWS {
                    break 'patterns;
                }
            }
        }
    }

    windows.join(EVIDENCE_DELIMITER)
}

// Byte range [start, end) widened by CONTEXT_CHARS characters each side.
fn context_window(text: &str, start: usize, end: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryDef;

    fn category(patterns: &[&str]) -> Category {
        let def = CategoryDef::new("test", patterns.iter().map(|p| p.to_string()).collect());
        Category::compile(&def, true).unwrap()
    }

    #[test]
    fn test_window_is_twenty_chars_each_side() {
        let text = format!("{}scam{}", "a".repeat(30), "b".repeat(30));
        let evidence = extract_evidence(&category(&["scam"]), &text);
        assert_eq!(evidence, format!("{}scam{}", "a".repeat(20), "b".repeat(20)));
    }

    #[test]
    fn test_window_counts_characters_not_bytes() {
        let text = format!("{}诈骗{}", "中".repeat(25), "文".repeat(25));
        let evidence = extract_evidence(&category(&["诈骗"]), &text);
        assert_eq!(evidence.chars().count(), 42);
    }

    #[test]
    fn test_window_is_trimmed_and_clamped() {
        let evidence = extract_evidence(&category(&["scam"]), "  scam  ");
        assert_eq!(evidence, "scam");
    }

    #[test]
    fn test_dedup_and_cap() {
        let cat = category(&["scam", "Scam", "fee", "prize", "lottery"]);
        let gap = format!(" {} ", ".".repeat(23));
        let text = format!("scam.{gap}fee{gap}prize{gap}lottery");
        let evidence = extract_evidence(&cat, &text);
        let parts: Vec<&str> = evidence.split(EVIDENCE_DELIMITER).collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].starts_with("scam"));
        assert!(parts[1].contains("fee"));
        assert!(parts[2].contains("prize"));
    }

    #[test]
    fn test_no_hit_is_empty() {
        assert_eq!(extract_evidence(&category(&["scam"]), "all good"), "");
    }
}
