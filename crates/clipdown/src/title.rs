//! Note titles derived from clipped Markdown.

use once_cell::sync::Lazy;
use regex::Regex;

/// Title used when neither the content nor the fallback has any text.
pub const DEFAULT_TITLE: &str = "Untitled clip";

/// Longest title kept before truncation, in characters.
pub const MAX_TITLE_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

static BLOCK_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:#{1,6}\s+|[-*+]\s+|\d+\.\s+|>\s*)+").expect("block marker pattern is valid"));
static RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:-{3,}|\*{3,}|_{3,}|~{3,}|`{3,})$").expect("rule pattern is valid"));
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("link pattern is valid"));
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*|~~|[*`]").expect("emphasis pattern is valid"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Derive a note title from the first line of `content` that has text.
///
/// Markdown syntax is stripped first (heading and list markers, rules,
/// emphasis and code markers, link targets), then the text is cut to
/// [`MAX_TITLE_CHARS`] characters with `...` appended. Blank results fall
/// back to `fallback`, then to [`DEFAULT_TITLE`].
pub fn derive_title(content: &str, fallback: &str) -> String {
    let plain = content.lines().map(strip_markdown).find(|line| !line.is_empty());
    let Some(plain) = plain else {
        let fallback = fallback.trim();
        return if fallback.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            fallback.to_string()
        };
    };

    truncate(&plain)
}

fn strip_markdown(line: &str) -> String {
    let line = line.trim();
    if RULE.is_match(line) {
        return String::new();
    }
    let line = BLOCK_MARKER.replace(line, "");
    let line = LINK.replace_all(&line, "$1");
    let line = EMPHASIS.replace_all(&line, "");
    WHITESPACE.replace_all(line.trim(), " ").into_owned()
}

fn truncate(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    let mut cut: String = title.chars().take(MAX_TITLE_CHARS).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str(ELLIPSIS);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_first_non_blank_line() {
        assert_eq!(derive_title("\n\n  First line\nSecond", "fb"), "First line");
    }

    #[test]
    fn strips_heading_and_inline_markers() {
        assert_eq!(derive_title("## The **bold** `code` *way*", ""), "The bold code way");
    }

    #[test]
    fn keeps_link_text_and_drops_url() {
        assert_eq!(derive_title("See [the docs](https://example.com/) now", ""), "See the docs now");
        assert_eq!(derive_title("[Home](/) page", ""), "Home page");
    }

    #[test]
    fn skips_rules_and_fences() {
        assert_eq!(derive_title("---\n\nAfter the rule", ""), "After the rule");
        assert_eq!(derive_title("```\nfn main() {}\n```", ""), "fn main() {}");
    }

    #[test]
    fn strips_list_markers() {
        assert_eq!(derive_title("1. Pay bills.\n2. Wash car.", ""), "Pay bills.");
        assert_eq!(derive_title("- Bacon", ""), "Bacon");
    }

    #[test]
    fn long_titles_are_truncated_after_stripping() {
        let long = format!("# [{}](https://example.com/very/long/url)", "word ".repeat(20));
        let title = derive_title(&long, "");
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS - 1 + ELLIPSIS.len());
        assert!(!title.contains("]("));
    }

    #[test]
    fn exactly_fifty_characters_is_not_truncated() {
        let text = "x".repeat(MAX_TITLE_CHARS);
        assert_eq!(derive_title(&text, ""), text);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(60);
        assert_eq!(derive_title(&text, ""), format!("{}...", "é".repeat(50)));
    }

    #[test]
    fn falls_back_when_empty() {
        assert_eq!(derive_title("  \n ", " Page title "), "Page title");
        assert_eq!(derive_title("**", ""), DEFAULT_TITLE);
        assert_eq!(derive_title("", ""), DEFAULT_TITLE);
    }
}
