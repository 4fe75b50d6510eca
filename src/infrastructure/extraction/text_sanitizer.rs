use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static LINE_BREAK_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<head>\w)-[ \t]*\r?\n[ \t]*(?P<tail>\w)").unwrap());

/// Normalize raw extracted text before it reaches the classifier: NFKC
/// normalization, re-joining of words hyphenated across line breaks,
/// whitespace collapse, and paragraph-break preservation.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    let rejoined = LINE_BREAK_HYPHEN.replace_all(&normalized, "$head$tail");

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in rejoined.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            push_collapsed(trimmed, &mut current);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs.join("\n\n")
}

fn push_collapsed(line: &str, out: &mut String) {
    let mut in_gap = false;
    for ch in line.chars() {
        if ch.is_whitespace() {
            if !in_gap {
                out.push(' ');
                in_gap = true;
            }
        } else {
            out.push(ch);
            in_gap = false;
        }
    }
}
