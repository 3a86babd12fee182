use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Internal metadata for the current video, as held by the page.
///
/// `summary`, `runtime` and `credits_offset` are opaque: only the fields the
/// resolver needs are ever read from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub video_id: String,
    pub summary: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_offset: Option<Value>,
}

impl PageSnapshot {
    /// `(season, episode)` when the summary marks an episode with both set.
    pub fn episode_numbering(&self) -> Option<(u32, u32)> {
        if self.summary.get("type").and_then(Value::as_str) != Some("episode") {
            return None;
        }
        let season = positive_number(self.summary.get("season")?)?;
        let episode = positive_number(self.summary.get("episode")?)?;
        Some((season, episode))
    }
}

/// A non-zero integer, given either as a JSON number or a numeric string.
fn positive_number(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => u32::try_from(n.as_u64()?).ok()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (n > 0).then_some(n)
}

/// Ask the page for the current video's snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRequest {
    pub request_id: String,
}

/// The page's answer to a [`BridgeRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResponse {
    /// Echoed request id. Responses without one are never matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PageSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeResponse {
    /// Whether this response answers the request with `request_id`.
    pub fn answers(&self, request_id: &str) -> bool {
        self.request_id.as_deref() == Some(request_id)
    }
}

/// Messages exchanged over the page channel, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeMessage {
    #[serde(rename = "GET_NETFLIX_DATA")]
    Request(BridgeRequest),
    #[serde(rename = "NETFLIX_DATA_RESPONSE")]
    Response(BridgeResponse),
}
