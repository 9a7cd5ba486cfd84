use crate::state::AppState;
use axum::{routing::put, Router};

use super::session_handlers::{end_session, set_viewer};

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/", put(set_viewer).delete(end_session))
}
