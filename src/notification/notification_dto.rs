use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::notification_models::Notification;

/// Body of the upstream mark-read call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationRequest {
    pub notify_id: String,
    pub read: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUnreadCountRequest {
    #[validate(range(max = 100000))]
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub viewer_id: Option<String>,
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub all_read: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: usize,
    pub all_read: bool,
}
