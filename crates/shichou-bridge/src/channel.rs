use tokio::sync::broadcast;

use crate::protocol::BridgeMessage;

/// Messages buffered per listener before a slow listener starts lagging.
const CHANNEL_CAPACITY: usize = 64;

/// Shared message bus between the two contexts.
///
/// Like a window's message event: every posted message reaches every current
/// listener, including the poster's own. Listeners register by subscribing
/// and deregister by dropping their receiver.
#[derive(Debug, Clone)]
pub struct PageChannel {
    tx: broadcast::Sender<BridgeMessage>,
}

impl Default for PageChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl PageChannel {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Deliver a message to every current listener.
    pub fn post(&self, message: BridgeMessage) {
        if self.tx.send(message).is_err() {
            tracing::trace!("Posted message with no listeners");
        }
    }

    /// Register a listener for messages posted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeMessage> {
        self.tx.subscribe()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// A handle that can post without keeping the channel open.
    pub fn downgrade(&self) -> WeakPageChannel {
        WeakPageChannel {
            tx: self.tx.downgrade(),
        }
    }
}

/// Non-owning [`PageChannel`] handle.
///
/// Listeners see the channel close once every [`PageChannel`] is dropped,
/// regardless of how many weak handles remain.
#[derive(Debug, Clone)]
pub struct WeakPageChannel {
    tx: broadcast::WeakSender<BridgeMessage>,
}

impl WeakPageChannel {
    /// The channel, if any owner is still alive.
    pub fn upgrade(&self) -> Option<PageChannel> {
        self.tx.upgrade().map(|tx| PageChannel { tx })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::BridgeRequest;

    #[tokio::test]
    async fn test_post_reaches_all_listeners() {
        let channel = PageChannel::new();
        let mut a = channel.subscribe();
        let mut b = channel.subscribe();
        let msg = BridgeMessage::Request(BridgeRequest {
            request_id: "r1".into(),
        });
        channel.post(msg.clone());
        assert_eq!(a.recv().await.unwrap(), msg);
        assert_eq!(b.recv().await.unwrap(), msg);
    }

    #[test]
    fn test_listener_count_tracks_drops() {
        let channel = PageChannel::new();
        assert_eq!(channel.listener_count(), 0);
        let rx = channel.subscribe();
        assert_eq!(channel.listener_count(), 1);
        drop(rx);
        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn test_post_without_listeners() {
        let channel = PageChannel::new();
        channel.post(BridgeMessage::Request(BridgeRequest {
            request_id: "r1".into(),
        }));
    }
}
