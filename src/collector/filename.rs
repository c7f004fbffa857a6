use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

use crate::constants::{MAX_FILENAME_LEN, PROBLEMATIC_CHARS};

static SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s\-_]+").unwrap());

/// Check if a character is allowed in filenames (whitelist approach)
fn is_valid_filename_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.')
}

/// Derive a filesystem-safe filename stem from a cleaned episode title.
///
/// Deterministic for a given title: lowercase, unsafe characters replaced
/// with hyphens, separator runs collapsed, trimmed, capped at
/// `MAX_FILENAME_LEN` bytes by dropping whole words from the end. An empty
/// result falls back to a timestamp-based placeholder.
pub fn safe_filename(title: &str) -> String {
    let lowered = title.to_lowercase();

    let sanitized: String = lowered
        .chars()
        .map(|c| {
            if PROBLEMATIC_CHARS.contains(&c) || !is_valid_filename_char(c) {
                '-'
            } else {
                c
            }
        })
        .collect();

    let collapsed = SEPARATOR_RUN.replace_all(&sanitized, "-");
    let trimmed = collapsed.trim_matches('-');
    let capped = truncate_at_word_boundary(trimmed, MAX_FILENAME_LEN);

    if capped.is_empty() {
        format!("episode-{}", Utc::now().timestamp())
    } else {
        capped
    }
}

/// Cap a hyphen-separated name at `max_len` bytes, dropping whole words from
/// the end; a single word longer than the cap is hard-truncated on a char
/// boundary.
fn truncate_at_word_boundary(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    let mut out = String::new();
    for word in s.split('-') {
        let extra = if out.is_empty() {
            word.len()
        } else {
            word.len() + 1
        };
        if out.len() + extra > max_len {
            break;
        }
        if !out.is_empty() {
            out.push('-');
        }
        out.push_str(word);
    }

    if out.is_empty() {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        out = s[..end].trim_end_matches('-').to_string();
    }

    out
}
