//! Season/episode signals carried by the page URL.

use std::borrow::Cow;

use shichou_parse::SeasonEpisode;
use url::Url;

const SEASON_KEY: &str = "season";
const EPISODE_KEY: &str = "episode";

/// `?season=<n>&episode=<n>` in the query string. Both must be numeric.
pub fn query_season_episode(url: &str) -> Option<SeasonEpisode> {
    let parsed = Url::parse(url).ok()?;
    numbering_from_pairs(parsed.query_pairs())
}

/// `#season=<n>&episode=<n>` in the fragment. Both must be numeric.
pub fn fragment_season_episode(url: &str) -> Option<SeasonEpisode> {
    let parsed = Url::parse(url).ok()?;
    numbering_from_pairs(fragment_pairs(parsed.fragment()?))
}

/// Whether the query or fragment names a season or episode at all.
pub fn has_series_marker(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if parsed.query_pairs().any(|(key, _)| is_marker_key(&key)) {
        return true;
    }
    parsed
        .fragment()
        .is_some_and(|fragment| fragment_pairs(fragment).any(|(key, _)| is_marker_key(&key)))
}

fn is_marker_key(key: &str) -> bool {
    key == SEASON_KEY || key == EPISODE_KEY
}

/// Fragments may carry a pseudo-query (`#player?season=2`); parse what follows `?`.
fn fragment_pairs(fragment: &str) -> url::form_urlencoded::Parse<'_> {
    let query = fragment
        .rsplit_once('?')
        .map_or(fragment, |(_, query)| query);
    url::form_urlencoded::parse(query.as_bytes())
}

fn numbering_from_pairs<'a>(
    pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
) -> Option<SeasonEpisode> {
    let mut season = None;
    let mut episode = None;
    for (key, value) in pairs {
        if key == SEASON_KEY && season.is_none() {
            season = Some(value);
        } else if key == EPISODE_KEY && episode.is_none() {
            episode = Some(value);
        }
    }

    let season: u32 = season?.parse().ok()?;
    let episode: u32 = episode?.parse().ok()?;
    Some(SeasonEpisode::new(season, episode))
}
