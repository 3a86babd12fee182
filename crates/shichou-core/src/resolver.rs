//! Season/episode resolution.
//!
//! Strategies run in a fixed order and the first hit wins; values from
//! different sources are never combined.

use shichou_bridge::PageSnapshot;
use shichou_detect::extract::video_title_text;
use shichou_detect::location::{fragment_season_episode, query_season_episode};
use shichou_detect::{PageSource, SelectorDatabase};
use shichou_parse::{parse_episode_marker, parse_title_numbering, SeasonEpisode};

/// Which strategy produced a season/episode pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingSource {
    /// The page snapshot marks the video as an episode.
    Snapshot,
    /// `season=` / `episode=` query parameters.
    Query,
    /// `season=` / `episode=` in the hash fragment.
    Fragment,
    /// Marker in the raw title text.
    Title,
    /// Marker in the player's displayed title element.
    VideoTitle,
}

impl NumberingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Query => "query",
            Self::Fragment => "fragment",
            Self::Title => "title",
            Self::VideoTitle => "video_title",
        }
    }
}

/// Resolve the season and episode for the current page.
///
/// Both stay `None` when no strategy succeeds.
pub fn resolve_season_episode(
    page: &dyn PageSource,
    db: &SelectorDatabase,
    snapshot: Option<&PageSnapshot>,
    raw_title: &str,
) -> SeasonEpisode {
    match resolve_with_source(page, db, snapshot, raw_title) {
        Some((numbering, source)) => {
            tracing::debug!(
                strategy = source.as_str(),
                season = ?numbering.season,
                episode = ?numbering.episode,
                "Season/episode resolved"
            );
            numbering
        }
        None => {
            tracing::debug!("No season/episode found");
            SeasonEpisode::default()
        }
    }
}

/// Run the strategies in order, reporting which one matched.
pub fn resolve_with_source(
    page: &dyn PageSource,
    db: &SelectorDatabase,
    snapshot: Option<&PageSnapshot>,
    raw_title: &str,
) -> Option<(SeasonEpisode, NumberingSource)> {
    if let Some((season, episode)) = snapshot.and_then(PageSnapshot::episode_numbering) {
        return Some((SeasonEpisode::new(season, episode), NumberingSource::Snapshot));
    }

    let url = page.current_url();
    if let Some(numbering) = query_season_episode(&url) {
        return Some((numbering, NumberingSource::Query));
    }
    if let Some(numbering) = fragment_season_episode(&url) {
        return Some((numbering, NumberingSource::Fragment));
    }

    if let Some(numbering) = parse_title_numbering(raw_title) {
        return Some((numbering, NumberingSource::Title));
    }

    let displayed = video_title_text(page, db)?;
    parse_episode_marker(&displayed).map(|numbering| (numbering, NumberingSource::VideoTitle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shichou_detect::HtmlPage;

    fn page(url: &str, body: &str) -> HtmlPage {
        HtmlPage::parse(&format!("<html><body>{body}</body></html>"), url)
    }

    fn episode_snapshot(season: u32, episode: u32) -> PageSnapshot {
        PageSnapshot {
            video_id: "80100172".into(),
            summary: json!({"type": "episode", "season": season, "episode": episode}),
            runtime: None,
            credits_offset: None,
        }
    }

    fn resolve(page: &HtmlPage, snapshot: Option<&PageSnapshot>, raw_title: &str) -> Option<NumberingSource> {
        resolve_with_source(page, &SelectorDatabase::embedded(), snapshot, raw_title)
            .map(|(_, source)| source)
    }

    #[test]
    fn test_snapshot_wins_over_everything() {
        let page = page(
            "https://www.netflix.com/watch/80100172?season=3&episode=4#season=5&episode=6",
            r#"<div data-uia="video-title">Dark T7:E8</div>"#,
        );
        let snapshot = episode_snapshot(1, 2);
        let numbering = resolve_season_episode(
            &page,
            &SelectorDatabase::embedded(),
            Some(&snapshot),
            "Dark T9:E10",
        );
        assert_eq!(numbering, SeasonEpisode::new(1, 2));
    }

    #[test]
    fn test_movie_snapshot_falls_through() {
        let page = page("https://www.netflix.com/watch/1?season=3&episode=4", "");
        let snapshot = PageSnapshot {
            summary: json!({"type": "movie"}),
            ..episode_snapshot(1, 1)
        };
        assert_eq!(resolve(&page, Some(&snapshot), "Roma"), Some(NumberingSource::Query));
    }

    #[test]
    fn test_query_parameters() {
        let page = page("https://www.netflix.com/watch/1?season=2&episode=7", "");
        let numbering = resolve_season_episode(&page, &SelectorDatabase::embedded(), None, "Dark");
        assert_eq!(numbering, SeasonEpisode::new(2, 7));
    }

    #[test]
    fn test_non_numeric_query_falls_through() {
        let page = page("https://www.netflix.com/watch/1?season=x&episode=7#season=2&episode=3", "");
        let numbering = resolve_season_episode(&page, &SelectorDatabase::embedded(), None, "Dark");
        assert_eq!(numbering, SeasonEpisode::new(2, 3));
        assert_eq!(resolve(&page, None, "Dark"), Some(NumberingSource::Fragment));
    }

    #[test]
    fn test_title_markers() {
        let page = page("https://www.netflix.com/watch/1", "");
        let db = SelectorDatabase::embedded();
        assert_eq!(
            resolve_season_episode(&page, &db, None, "Dark T1:E3 Secrets"),
            SeasonEpisode::new(1, 3)
        );

        let episode_only = resolve_season_episode(&page, &db, None, "Dark E4");
        assert_eq!(episode_only.season, None);
        assert_eq!(episode_only.episode, Some(4));
    }

    #[test]
    fn test_video_title_element() {
        let page = page(
            "https://www.netflix.com/watch/1",
            r#"<div data-uia="video-title">Dark T2: E5</div>"#,
        );
        assert_eq!(resolve(&page, None, "Dark"), Some(NumberingSource::VideoTitle));
        assert_eq!(
            resolve_season_episode(&page, &SelectorDatabase::embedded(), None, "Dark"),
            SeasonEpisode::new(2, 5)
        );
    }

    #[test]
    fn test_nothing_resolves() {
        let page = page("https://www.netflix.com/watch/1", "<h1>Roma</h1>");
        let numbering = resolve_season_episode(&page, &SelectorDatabase::embedded(), None, "Roma");
        assert!(numbering.is_empty());
    }
}
