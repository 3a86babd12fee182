use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::channel::PageChannel;
use crate::protocol::{BridgeMessage, BridgeRequest, BridgeResponse, PageSnapshot};

/// How long to wait for the page before carrying on without a snapshot.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Extraction-side handle for fetching page snapshots.
#[derive(Debug, Clone)]
pub struct DataBridge {
    channel: PageChannel,
    timeout: Duration,
}

impl DataBridge {
    pub fn new(channel: PageChannel) -> Self {
        Self {
            channel,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch the current video's snapshot from the page.
    ///
    /// Never fails: a failure response, a page with no data for the current
    /// video, or no answer within the timeout all resolve to `None`. The
    /// listener registered for the call is dropped before returning.
    pub async fn fetch_snapshot(&self) -> Option<PageSnapshot> {
        let request_id = format!("netflix-data-{}", Uuid::new_v4());

        // Register before posting so a fast responder cannot be missed.
        let mut rx = self.channel.subscribe();
        self.channel.post(BridgeMessage::Request(BridgeRequest {
            request_id: request_id.clone(),
        }));

        let response =
            match tokio::time::timeout(self.timeout, wait_for_response(&mut rx, &request_id)).await
            {
                Ok(response) => response,
                Err(_) => {
                    tracing::debug!(
                        request_id = %request_id,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "No snapshot response before timeout"
                    );
                    return None;
                }
            };

        if !response.success {
            match &response.error {
                Some(error) => {
                    tracing::warn!(request_id = %request_id, error = %error, "Page failed to provide snapshot")
                }
                None => tracing::debug!(request_id = %request_id, "Page has no snapshot for this video"),
            }
            return None;
        }

        if let Some(data) = &response.data {
            tracing::debug!(video_id = %data.video_id, "Received page snapshot");
        }
        response.data
    }
}

/// Wait for the response correlated with `request_id`, skipping everything else.
///
/// The bridge owns a sender, so the channel cannot close under this listener;
/// if it ever did, the wait parks until the caller's timeout fires.
async fn wait_for_response(
    rx: &mut broadcast::Receiver<BridgeMessage>,
    request_id: &str,
) -> BridgeResponse {
    loop {
        match rx.recv().await {
            Ok(BridgeMessage::Response(response)) if response.answers(request_id) => {
                return response;
            }
            Ok(_) => continue,
            Err(RecvError::Closed) => std::future::pending::<()>().await,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Snapshot listener lagged behind the page channel");
            }
        }
    }
}
