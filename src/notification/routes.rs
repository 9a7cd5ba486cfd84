use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, put},
    Router,
};

use super::notification_handlers::{
    delete_notification, get_feed, mark_notification_read, toast_stream, update_unread_count,
};

pub fn feed_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_feed))
        .route("/toasts", get(toast_stream))
        .route("/unread-count", put(update_unread_count))
        .route("/:id", delete(delete_notification))
        .route("/:id/read", patch(mark_notification_read))
}
