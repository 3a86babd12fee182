use regex::Regex;
use std::sync::LazyLock;

use crate::keyword::{DURATION_MARKERS, GENRE_SEPARATORS};

/// First run of four digits.
static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{4})").unwrap());

/// Pull a release year out of a metadata label ("2019", "Estreno: 2021").
pub fn parse_year(text: &str) -> Option<u32> {
    let caps = RE_YEAR.captures(text)?;
    caps[1].parse().ok()
}

/// Split a genre label into individual genres.
///
/// Splits on `,` `•` `·`, trims, and drops empties. Duplicates are removed
/// while keeping first-seen order.
pub fn split_genres(text: &str) -> Vec<String> {
    let mut genres = Vec::new();
    push_genres(text, &mut genres);
    genres
}

/// Append the genres found in `text` to `out`, skipping ones already present.
pub fn push_genres(text: &str, out: &mut Vec<String>) {
    for genre in text.split(GENRE_SEPARATORS) {
        let genre = genre.trim();
        if !genre.is_empty() && !out.iter().any(|g| g == genre) {
            out.push(genre.to_string());
        }
    }
}

/// Whether a label looks like a runtime ("1 h 52 min") or season count.
pub fn is_duration_text(text: &str) -> bool {
    DURATION_MARKERS.iter().any(|m| text.contains(m))
}
