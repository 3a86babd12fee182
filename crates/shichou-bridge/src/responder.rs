use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::channel::{PageChannel, WeakPageChannel};
use crate::error::BridgeError;
use crate::protocol::{BridgeMessage, BridgeRequest, BridgeResponse, PageSnapshot};

/// The page's internal object cache, addressed by video id.
pub trait VideoCache: Send + Sync + 'static {
    /// Snapshot for `video_id`, `Ok(None)` when the cache has no entry.
    fn lookup(&self, video_id: &str) -> Result<Option<PageSnapshot>, BridgeError>;
}

/// A [`VideoCache`] over the page's falcor cache object:
/// `{ videos: { <id>: { summary: {value}, runtime: {value}, creditsOffset: {value} } } }`.
#[derive(Debug, Clone)]
pub struct FalcorCache {
    root: Value,
}

impl FalcorCache {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

impl VideoCache for FalcorCache {
    fn lookup(&self, video_id: &str) -> Result<Option<PageSnapshot>, BridgeError> {
        let Some(videos) = self.root.get("videos") else {
            return Ok(None);
        };
        if !videos.is_object() {
            return Err(BridgeError::MalformedCache(
                "`videos` is not an object".into(),
            ));
        }

        let Some(video) = videos.get(video_id) else {
            return Ok(None);
        };
        let Some(summary) = leaf_value(video, "summary") else {
            return Ok(None);
        };

        Ok(Some(PageSnapshot {
            video_id: video_id.to_string(),
            summary: summary.clone(),
            runtime: leaf_value(video, "runtime").cloned(),
            credits_offset: leaf_value(video, "creditsOffset").cloned(),
        }))
    }
}

/// `video[key].value`, treating `null` as absent.
fn leaf_value<'a>(video: &'a Value, key: &str) -> Option<&'a Value> {
    video
        .get(key)
        .and_then(|node| node.get("value"))
        .filter(|value| !value.is_null())
}

/// Page-side handler answering snapshot requests from the cache.
#[derive(Debug)]
pub struct PageResponder<C> {
    cache: C,
}

impl<C: VideoCache> PageResponder<C> {
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    /// Answer one request for the page currently at `url`.
    ///
    /// Every outcome becomes a response: a missing video id or cache entry is
    /// `success: false` with no error, a failed lookup carries the error text.
    pub fn respond(&self, request: &BridgeRequest, url: &str) -> BridgeResponse {
        let lookup = match shichou_parse::video_id(url) {
            Some(id) => self.cache.lookup(id),
            None => Ok(None),
        };

        match lookup {
            Ok(data) => BridgeResponse {
                request_id: Some(request.request_id.clone()),
                success: data.is_some(),
                data,
                error: None,
            },
            Err(e) => {
                tracing::warn!(request_id = %request.request_id, error = %e, "Snapshot lookup failed");
                BridgeResponse {
                    request_id: Some(request.request_id.clone()),
                    success: false,
                    data: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Serve requests on `channel` until every owning handle is dropped.
    ///
    /// The task only holds a weak handle, so it ends with the page that owns
    /// the channel. `location` tracks the page URL so in-page navigation is
    /// picked up. The listener is registered before this returns.
    pub fn spawn(self, channel: PageChannel, location: watch::Receiver<String>) -> JoinHandle<()> {
        let rx = channel.subscribe();
        let replies = channel.downgrade();
        tracing::debug!("Snapshot responder listening");
        tokio::spawn(self.serve(rx, replies, location))
    }

    async fn serve(
        self,
        mut rx: broadcast::Receiver<BridgeMessage>,
        replies: WeakPageChannel,
        location: watch::Receiver<String>,
    ) {
        loop {
            match rx.recv().await {
                Ok(BridgeMessage::Request(request)) => {
                    let url = location.borrow().clone();
                    let response = self.respond(&request, &url);
                    match replies.upgrade() {
                        Some(channel) => channel.post(BridgeMessage::Response(response)),
                        None => break,
                    }
                }
                Ok(BridgeMessage::Response(_)) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Snapshot responder lagged behind the page channel");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::debug!("Snapshot responder stopped");
    }
}
