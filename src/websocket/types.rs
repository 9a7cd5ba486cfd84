use serde::{Deserialize, Serialize};

use crate::notification::{FeedEvent, Notification, Toast};

pub const RECEIVE_NOTIFY: &str = "receive-notify";

/// Events carried on the shared realtime channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ChannelEvent {
    /// A new notification pushed by the backend. `title` travels with the
    /// event but nothing reads it.
    #[serde(rename = "receive-notify")]
    ReceiveNotify {
        notification: Notification,
        #[serde(default)]
        title: Option<String>,
    },
}

impl ChannelEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelEvent::ReceiveNotify { .. } => RECEIVE_NOTIFY,
        }
    }
}

// Server-to-client messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum WsMessage {
    Feed(FeedEvent),
    Toast(Toast),
    Error(ErrorPayload),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}
