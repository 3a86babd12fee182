use shichou_detect::extract::{has_series_indicator, video_title_text};
use shichou_detect::location::has_series_marker;
use shichou_detect::{PageSource, SelectorDatabase};
use shichou_parse::{has_episode_marker, is_watch_url, SeasonEpisode};

use crate::models::MediaType;

/// Signal that marked a page as a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSignal {
    /// Season or episode already resolved.
    Numbering,
    /// `season=` / `episode=` in the query or fragment.
    UrlMarker,
    /// A series indicator element is present.
    Indicator,
    /// The displayed video title carries a "T<n>:E<n>" marker.
    VideoTitle,
    /// Playback page whose document title carries a series keyword.
    DocumentKeyword,
}

impl SeriesSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numbering => "numbering",
            Self::UrlMarker => "url_marker",
            Self::Indicator => "indicator",
            Self::VideoTitle => "video_title",
            Self::DocumentKeyword => "document_keyword",
        }
    }
}

/// Classify the page as movie or series. Defaults to movie.
pub fn classify(
    page: &dyn PageSource,
    db: &SelectorDatabase,
    numbering: &SeasonEpisode,
) -> MediaType {
    match series_signal(page, db, numbering) {
        Some(signal) => {
            tracing::debug!(signal = signal.as_str(), "Classified as series");
            MediaType::Series
        }
        None => {
            tracing::debug!("No series signal, classified as movie");
            MediaType::Movie
        }
    }
}

/// First series signal found, checked in priority order.
pub fn series_signal(
    page: &dyn PageSource,
    db: &SelectorDatabase,
    numbering: &SeasonEpisode,
) -> Option<SeriesSignal> {
    if !numbering.is_empty() {
        return Some(SeriesSignal::Numbering);
    }

    let url = page.current_url();
    if has_series_marker(&url) {
        return Some(SeriesSignal::UrlMarker);
    }

    if has_series_indicator(page, db) {
        return Some(SeriesSignal::Indicator);
    }

    if video_title_text(page, db).is_some_and(|text| has_episode_marker(&text)) {
        return Some(SeriesSignal::VideoTitle);
    }

    if is_watch_url(&url) && db.has_series_keyword(&page.document_title()) {
        return Some(SeriesSignal::DocumentKeyword);
    }

    None
}
