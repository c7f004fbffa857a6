use std::sync::LazyLock;

use regex::Regex;

use crate::episode::Episode;

static LEADING_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+)").unwrap());
static CHAPTER_IN_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Capítol (\d+)").unwrap());
static ANY_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").unwrap());

/// Best-effort chapter number for sort ordering.
///
/// Tried in order: a leading integer in the title, a "Capítol N" reference in
/// the description, any digit run in the title. None when no heuristic
/// matches.
pub fn episode_number(episode: &Episode) -> Option<u32> {
    if let Some(num) = capture_number(&LEADING_NUMBER, &episode.title)
        && num > 0
    {
        return Some(num);
    }

    if let Some(num) = capture_number(&CHAPTER_IN_DESCRIPTION, &episode.description) {
        return Some(num);
    }

    capture_number(&ANY_NUMBER, &episode.title)
}

fn capture_number(pattern: &Regex, haystack: &str) -> Option<u32> {
    pattern
        .captures(haystack)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}
