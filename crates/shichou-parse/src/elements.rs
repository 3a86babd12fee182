use serde::{Deserialize, Serialize};

/// A raw title split into the show/movie name and an optional episode name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleParts {
    /// Base title (e.g., "Dark").
    pub title: String,
    /// Episode-specific title (e.g., "Secrets").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_title: Option<String>,
}

/// Season/episode numbering recovered from a single source.
///
/// Either half may be missing: "E5" alone yields an episode with no season.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonEpisode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl SeasonEpisode {
    pub fn new(season: u32, episode: u32) -> Self {
        Self {
            season: Some(season),
            episode: Some(episode),
        }
    }

    /// Neither season nor episode is known.
    pub fn is_empty(&self) -> bool {
        self.season.is_none() && self.episode.is_none()
    }
}
