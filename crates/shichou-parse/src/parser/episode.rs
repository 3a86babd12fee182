use regex::Regex;
use std::sync::LazyLock;

use crate::elements::SeasonEpisode;

// ── Regex patterns (compiled once) ──────────────────────────────

/// "T2: E5", "T2:E5", "t1 e3": season + episode.
static RE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)T(\d+):?\s*E(\d+)").unwrap());

/// Season + episode marker, or a bare "E5" episode marker.
static RE_TITLE_NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)T(\d+):?\s*E(\d+)|E(\d+)").unwrap());

/// Parse numbering out of a raw (unsplit) title.
///
/// A season+episode marker yields both numbers; a bare "E<n>" yields the
/// episode only. Captures that overflow `u32` count as no match.
///
/// # Example
/// ```
/// let se = shichou_parse::parse_title_numbering("Dark T1: E3 Pasado y presente").unwrap();
/// assert_eq!(se.season, Some(1));
/// assert_eq!(se.episode, Some(3));
/// ```
pub fn parse_title_numbering(raw_title: &str) -> Option<SeasonEpisode> {
    let caps = RE_TITLE_NUMBERING.captures(raw_title)?;

    if let (Some(season), Some(episode)) = (caps.get(1), caps.get(2)) {
        let season = season.as_str().parse().ok()?;
        let episode = episode.as_str().parse().ok()?;
        return Some(SeasonEpisode::new(season, episode));
    }

    let episode = caps.get(3)?.as_str().parse().ok()?;
    Some(SeasonEpisode {
        season: None,
        episode: Some(episode),
    })
}

/// Parse a strict season+episode marker ("T<n>:E<n>") from displayed text.
pub fn parse_episode_marker(text: &str) -> Option<SeasonEpisode> {
    let caps = RE_MARKER.captures(text)?;
    let season = caps[1].parse().ok()?;
    let episode = caps[2].parse().ok()?;
    Some(SeasonEpisode::new(season, episode))
}

/// Whether the text carries a season+episode marker at all.
pub fn has_episode_marker(text: &str) -> bool {
    RE_MARKER.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_numbering_combined() {
        let se = parse_title_numbering("Show T2: E5 The Return").unwrap();
        assert_eq!(se, SeasonEpisode::new(2, 5));
    }

    #[test]
    fn test_title_numbering_no_colon() {
        let se = parse_title_numbering("Show T10 E12").unwrap();
        assert_eq!(se, SeasonEpisode::new(10, 12));
    }

    #[test]
    fn test_title_numbering_lowercase() {
        let se = parse_title_numbering("show t1:e4").unwrap();
        assert_eq!(se, SeasonEpisode::new(1, 4));
    }

    #[test]
    fn test_title_numbering_episode_only() {
        let se = parse_title_numbering("Limited Series E7").unwrap();
        assert_eq!(se.season, None);
        assert_eq!(se.episode, Some(7));
    }

    #[test]
    fn test_title_numbering_none() {
        assert!(parse_title_numbering("The Irishman").is_none());
    }

    #[test]
    fn test_title_numbering_overflow_is_no_match() {
        assert!(parse_title_numbering("Show T1: E99999999999").is_none());
    }

    #[test]
    fn test_marker_requires_season() {
        assert!(parse_episode_marker("Episode E5").is_none());
        assert_eq!(
            parse_episode_marker("Dark T3:E8"),
            Some(SeasonEpisode::new(3, 8))
        );
    }

    #[test]
    fn test_has_marker() {
        assert!(has_episode_marker("Ozark T4: E1"));
        assert!(!has_episode_marker("Ozark"));
    }
}
