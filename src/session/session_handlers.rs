use crate::{
    error::Result,
    notification::notification_repository::validate_path_segment,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use super::session_dto::{SessionResponse, SetViewerRequest};

/// Activate or switch the viewer whose feed is tracked
#[utoipa::path(
    put,
    path = "/api/session",
    request_body = SetViewerRequest,
    responses(
        (status = 200, description = "Viewer active", body = SessionResponse),
        (status = 400, description = "Invalid viewer id")
    ),
    tag = "session"
)]
pub async fn set_viewer(
    State(state): State<AppState>,
    Json(payload): Json<SetViewerRequest>,
) -> Result<Json<SessionResponse>> {
    payload.validate()?;
    validate_path_segment(&payload.viewer_id)?;

    let changed = state.feed.set_viewer(payload.viewer_id).await;

    Ok(Json(SessionResponse {
        viewer_id: state.feed.viewer_id().await,
        changed,
    }))
}

/// End the session and drop the feed
#[utoipa::path(
    delete,
    path = "/api/session",
    responses(
        (status = 204, description = "Session ended")
    ),
    tag = "session"
)]
pub async fn end_session(State(state): State<AppState>) -> StatusCode {
    state.feed.end_session().await;
    StatusCode::NO_CONTENT
}
