use std::sync::LazyLock;

use regex::Regex;

use crate::constants::TEXT_SUFFIXES;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static TRAILING_DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*Durada:\s*\d+\s*min.*$").unwrap());

/// Shared cleanup: strip markup, decode entities, collapse whitespace, trim
fn clean_text(raw: &str) -> String {
    let stripped = HTML_TAG.replace_all(raw, "");
    let decoded = html_escape::decode_html_entities(&stripped);
    let collapsed = WHITESPACE.replace_all(&decoded, " ");
    collapsed.trim().to_string()
}

/// Clean an episode title: shared cleanup plus removal of the trailing
/// "Durada: N min" annotation some listings append
pub fn clean_title(raw: &str) -> String {
    let cleaned = clean_text(raw);
    TRAILING_DURATION.replace(&cleaned, "").trim().to_string()
}

/// Clean an episode description: shared cleanup plus removal of the
/// truncation boilerplate suffixes
pub fn clean_description(raw: &str) -> String {
    let mut cleaned = clean_text(raw);

    for suffix in TEXT_SUFFIXES {
        if let Some(trimmed) = cleaned.strip_suffix(suffix) {
            cleaned = trimmed.to_string();
        }
    }

    cleaned.trim().to_string()
}
