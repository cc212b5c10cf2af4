use regex::Regex;
use std::sync::OnceLock;

fn list_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?:[-*+]|\d+\.)\s").expect("valid list item regex"))
}

/// Makes every prose line of a markdown document end with punctuation.
///
/// Headers, blank lines and fenced code are left alone. List items accept
/// `.!?:)` as terminators, other lines `.!?` or a trailing `:`.
pub fn ensure_proper_punctuation(text: &str) -> String {
    let mut in_fence = false;
    let mut out: Vec<String> = Vec::new();

    for line in text.split('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            out.push(line.to_string());
            continue;
        }
        if in_fence || trimmed.is_empty() || trimmed.starts_with('#') {
            out.push(line.to_string());
            continue;
        }

        let mut fixed = line.trim_end().to_string();
        let terminators: &[char] = if list_item_re().is_match(line) {
            &['.', '!', '?', ':', ')']
        } else {
            &['.', '!', '?', ':']
        };
        if !fixed.ends_with(terminators) {
            fixed.push('.');
        }
        out.push(fixed);
    }

    out.join("\n")
}

/// First `max` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Greedy word wrap at `width` columns. Words longer than `width` get a line of their own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
