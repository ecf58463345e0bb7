//! Broadcast of saved orders to connected pages.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages pushed to connected pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    /// Connection established
    Connected,

    /// A row was appended to the order log
    OrderSaved {
        /// Row id
        id: i64,
        /// Saved order name
        order_name: String,
    },
}

/// Hub for broadcasting feed messages to all connected pages.
#[derive(Debug, Clone)]
pub struct HistoryFeed {
    sender: broadcast::Sender<FeedMessage>,
}

impl HistoryFeed {
    /// Create a new feed.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected pages.
    pub fn send(&self, msg: FeedMessage) {
        // no receivers is fine
        let _ = self.sender.send(msg);
    }

    /// Subscribe to feed messages.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedMessage> {
        self.sender.subscribe()
    }

    /// Number of connected pages.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for HistoryFeed {
    fn default() -> Self {
        Self::new()
    }
}
