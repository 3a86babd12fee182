use regex::Regex;
use std::sync::LazyLock;

use crate::elements::TitleParts;
use crate::keyword;

/// "<show> [T<n>:] E<n> <episode title>".
static RE_NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)\s*(?:T\d+:?\s*)?E\d+(.*)$").unwrap());

/// "<show>: <episode title>".
static RE_COLON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+?):\s*(.+)$").unwrap());

/// "<show> - <episode title>" (hyphen or en dash, space before the dash).
static RE_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s+[-\u{2013}]\s*(.+)$").unwrap());

/// Split a raw title into the base title and an optional episode title.
///
/// Strategies, first structural match wins:
/// 1. numbered: `Show T2: E5 Name`
/// 2. colon: `Show: Name`, unless the right side opens with an article
/// 3. dash: `Show - Name`
/// 4. the whole trimmed string
///
/// # Example
/// ```
/// let parts = shichou_parse::split_title("Show T2: E5 The Return");
/// assert_eq!(parts.title, "Show");
/// assert_eq!(parts.episode_title.as_deref(), Some("The Return"));
/// ```
pub fn split_title(raw: &str) -> TitleParts {
    let raw = raw.trim();

    let strategies: [(&str, fn(&str) -> Option<TitleParts>); 3] = [
        ("numbered", try_numbered),
        ("colon", try_colon),
        ("dash", try_dash),
    ];
    for (name, strategy) in strategies {
        if let Some(parts) = strategy(raw) {
            tracing::trace!(strategy = name, title = %parts.title, "Title split");
            return parts;
        }
    }

    TitleParts {
        title: raw.to_string(),
        episode_title: None,
    }
}

fn try_numbered(raw: &str) -> Option<TitleParts> {
    let caps = RE_NUMBERED.captures(raw)?;
    let title = clean_base(&caps[1]);
    if title.is_empty() {
        return None;
    }
    Some(TitleParts {
        title,
        episode_title: clean_episode(&caps[2]),
    })
}

fn try_colon(raw: &str) -> Option<TitleParts> {
    let caps = RE_COLON.captures(raw)?;
    let rest = &caps[2];

    // "Narcos: La historia" keeps its colon.
    if let Some((first_word, _)) = rest.split_once(char::is_whitespace) {
        if keyword::is_title_article(first_word) {
            return None;
        }
    }

    let title = clean_base(&caps[1]);
    if title.is_empty() {
        return None;
    }
    Some(TitleParts {
        title,
        episode_title: clean_episode(rest),
    })
}

fn try_dash(raw: &str) -> Option<TitleParts> {
    let caps = RE_DASH.captures(raw)?;
    let title = clean_base(&caps[1]);
    if title.is_empty() {
        return None;
    }
    Some(TitleParts {
        title,
        episode_title: clean_episode(&caps[2]),
    })
}

fn clean_base(text: &str) -> String {
    text.trim()
        .trim_end_matches([':', '-', '\u{2013}'])
        .trim()
        .to_string()
}

fn clean_episode(text: &str) -> Option<String> {
    let text = text.trim().trim_start_matches([':', '-', '\u{2013}']).trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(raw: &str) -> (String, Option<String>) {
        let parts = split_title(raw);
        (parts.title, parts.episode_title)
    }

    #[test]
    fn test_numbered_with_season() {
        assert_eq!(
            split("Show T2: E5 The Return"),
            ("Show".into(), Some("The Return".into()))
        );
    }

    #[test]
    fn test_numbered_episode_only() {
        assert_eq!(
            split("Chernobyl E1 1:23:45"),
            ("Chernobyl".into(), Some("1:23:45".into()))
        );
    }

    #[test]
    fn test_numbered_without_episode_title() {
        assert_eq!(split("Dark T1:E1"), ("Dark".into(), None));
    }

    #[test]
    fn test_numbered_needs_leading_text() {
        // Nothing before the marker: falls through to the later strategies.
        assert_eq!(split("E5"), ("E5".into(), None));
    }

    #[test]
    fn test_colon_split() {
        assert_eq!(
            split("Black Mirror: Bandersnatch"),
            ("Black Mirror".into(), Some("Bandersnatch".into()))
        );
    }

    #[test]
    fn test_colon_article_guard() {
        assert_eq!(split("Show: La historia"), ("Show: La historia".into(), None));
        assert_eq!(
            split("Narcos: El origen del cartel"),
            ("Narcos: El origen del cartel".into(), None)
        );
    }

    #[test]
    fn test_colon_guard_falls_through_to_dash() {
        assert_eq!(
            split("Show: La historia - Parte 1"),
            ("Show: La historia".into(), Some("Parte 1".into()))
        );
    }

    #[test]
    fn test_dash_split() {
        assert_eq!(
            split("Show - The Return"),
            ("Show".into(), Some("The Return".into()))
        );
        assert_eq!(
            split("Show \u{2013} The Return"),
            ("Show".into(), Some("The Return".into()))
        );
    }

    #[test]
    fn test_hyphenated_word_not_split() {
        assert_eq!(split("Spider-Man"), ("Spider-Man".into(), None));
    }

    #[test]
    fn test_fallback_trims() {
        assert_eq!(split("  The Irishman  "), ("The Irishman".into(), None));
    }
}
