use chrono::Utc;
use shichou_bridge::{DataBridge, PageSnapshot};
use shichou_detect::extract::{extract_fields, extract_title};
use shichou_detect::{PageSource, SelectorDatabase};
use shichou_parse::split_title;
use url::Url;

use crate::classifier::classify;
use crate::config::AppConfig;
use crate::error::ShichouError;
use crate::models::{MediaRecord, MediaType};
use crate::resolver::resolve_season_episode;

pub const DEFAULT_PLACEHOLDER_TITLE: &str = "Unknown title";

/// Builds a [`MediaRecord`] from a page and an optional snapshot.
#[derive(Debug, Clone)]
pub struct MediaAssembler {
    selectors: SelectorDatabase,
    placeholder_title: String,
}

impl Default for MediaAssembler {
    fn default() -> Self {
        Self::new(SelectorDatabase::embedded(), DEFAULT_PLACEHOLDER_TITLE)
    }
}

impl MediaAssembler {
    pub fn new(selectors: SelectorDatabase, placeholder_title: impl Into<String>) -> Self {
        Self {
            selectors,
            placeholder_title: placeholder_title.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ShichouError> {
        Ok(Self::new(
            config.selector_database()?,
            config.extraction.placeholder_title.clone(),
        ))
    }

    /// Fetch a fresh snapshot through the bridge, then assemble.
    pub async fn extract(
        &self,
        page: &dyn PageSource,
        bridge: &DataBridge,
    ) -> Result<MediaRecord, ShichouError> {
        let snapshot = bridge.fetch_snapshot().await;
        self.assemble(page, snapshot.as_ref())
    }

    /// Run the full extraction pipeline against the page.
    ///
    /// Only fails when the page has no usable location; every other missing
    /// source degrades to an absent field or the placeholder title.
    pub fn assemble(
        &self,
        page: &dyn PageSource,
        snapshot: Option<&PageSnapshot>,
    ) -> Result<MediaRecord, ShichouError> {
        let url = page.current_url();
        if let Err(source) = Url::parse(&url) {
            return Err(ShichouError::InvalidUrl { url, source });
        }

        let db = &self.selectors;
        let raw_title = extract_title(page, db).unwrap_or_else(|| {
            tracing::debug!("No title source matched, using placeholder");
            self.placeholder_title.clone()
        });

        let numbering = resolve_season_episode(page, db, snapshot, &raw_title);
        let media_type = classify(page, db, &numbering);
        let parts = split_title(&raw_title);
        let fields = extract_fields(page, db);

        let title = if parts.title.is_empty() {
            self.placeholder_title.clone()
        } else {
            parts.title
        };
        if title.is_empty() {
            return Err(ShichouError::Extraction("no title and no placeholder".into()));
        }

        let mut record = MediaRecord {
            title,
            media_type,
            genres: fields.genres,
            netflix_url: url,
            extracted_at: Utc::now(),
            year: fields.year,
            duration: fields.duration,
            description: fields.description,
            image_url: fields.image_url,
            season: None,
            episode: None,
            episode_title: None,
        };

        if media_type == MediaType::Series {
            record.season = numbering.season.filter(|&n| n > 0);
            record.episode = numbering.episode.filter(|&n| n > 0);
            record.episode_title = parts.episode_title;
        }

        tracing::debug!(
            title = %record.title,
            media_type = record.media_type.as_str(),
            season = ?record.season,
            episode = ?record.episode,
            "Assembled media record"
        );
        Ok(record)
    }
}
