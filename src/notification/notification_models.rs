use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A notification as the marketplace backend emits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub receiver_id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// A user-facing transient message raised by a feed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Toast {
    Success(String),
    Error(String),
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Toast::Success(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast::Error(message.into())
    }
}

/// Change published whenever the feed store is mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    Loaded {
        notifications: Vec<Notification>,
        unread_count: usize,
        all_read: bool,
    },
    Prepended {
        notification: Notification,
        unread_count: usize,
        all_read: bool,
    },
    Removed {
        id: String,
    },
    Read {
        id: String,
    },
    UnreadCount {
        unread_count: usize,
        all_read: bool,
    },
    Cleared,
}
