use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::media::MediaRecord;

/// Emitted once per video when playback crosses the completion threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedEvent {
    #[serde(flatten)]
    pub media: MediaRecord,
    /// Completion ratio measured on the reporting tick.
    pub progress: f64,
    pub reported_at: DateTime<Utc>,
}

impl ViewedEvent {
    pub fn new(media: MediaRecord, progress: f64) -> Self {
        Self {
            media,
            progress,
            reported_at: Utc::now(),
        }
    }
}
