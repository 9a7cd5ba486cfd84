use crate::{
    error::Result,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive},
        Sse,
    },
    Json,
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use validator::Validate;

use super::notification_repository::validate_path_segment;
use super::notification_dto::{FeedResponse, UnreadCountResponse, UpdateUnreadCountRequest};

/// Get the active viewer's feed
#[utoipa::path(
    get,
    path = "/api/feed",
    responses(
        (status = 200, description = "Current feed, most recent first", body = FeedResponse)
    ),
    tag = "feed"
)]
pub async fn get_feed(State(state): State<AppState>) -> Json<FeedResponse> {
    Json(state.feed.snapshot().await)
}

/// Subscribe to toasts via Server-Sent Events
#[utoipa::path(
    get,
    path = "/api/feed/toasts",
    responses(
        (status = 200, description = "SSE stream of toasts")
    ),
    tag = "feed"
)]
pub async fn toast_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let rx = state.feed.subscribe_toasts();

    let stream = tokio_stream::wrappers::BroadcastStream::new(rx).filter_map(|msg| async move {
        let toast = msg.ok()?;
        let event = Event::default().json_data(&toast).ok()?;
        Some(Ok(event))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Delete a notification
#[utoipa::path(
    delete,
    path = "/api/feed/{id}",
    params(
        ("id" = String, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 400, description = "Invalid notification id"),
        (status = 409, description = "No active viewer"),
        (status = 502, description = "Backend rejected the delete")
    ),
    tag = "feed"
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    validate_path_segment(&id)?;
    state.feed.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Mark notification as read
#[utoipa::path(
    patch,
    path = "/api/feed/{id}/read",
    params(
        ("id" = String, Path, description = "Notification ID")
    ),
    responses(
        (status = 204, description = "Notification marked as read"),
        (status = 409, description = "No active viewer"),
        (status = 502, description = "Backend rejected the update")
    ),
    tag = "feed"
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.feed.mark_read(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Overwrite the unread badge counter
#[utoipa::path(
    put,
    path = "/api/feed/unread-count",
    request_body = UpdateUnreadCountRequest,
    responses(
        (status = 200, description = "Counter updated", body = UnreadCountResponse),
        (status = 400, description = "Invalid count")
    ),
    tag = "feed"
)]
pub async fn update_unread_count(
    State(state): State<AppState>,
    Json(payload): Json<UpdateUnreadCountRequest>,
) -> Result<Json<UnreadCountResponse>> {
    payload.validate()?;

    state.feed.update_unread_count(payload.count).await;
    let feed = state.feed.snapshot().await;

    Ok(Json(UnreadCountResponse {
        unread_count: feed.unread_count,
        all_read: feed.all_read,
    }))
}
