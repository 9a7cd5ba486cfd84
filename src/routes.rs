use crate::{
    notification::{self, feed_routes, notification_dto::*, Notification},
    session::{self, session_dto::*, session_routes},
    state::AppState,
    websocket::ws_handler,
};
use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        session::session_handlers::set_viewer,
        session::session_handlers::end_session,
        notification::notification_handlers::get_feed,
        notification::notification_handlers::toast_stream,
        notification::notification_handlers::delete_notification,
        notification::notification_handlers::mark_notification_read,
        notification::notification_handlers::update_unread_count,
    ),
    components(
        schemas(
            SetViewerRequest,
            SessionResponse,
            UpdateUnreadCountRequest,
            UnreadCountResponse,
            FeedResponse,
            Notification,
        )
    ),
    tags(
        (name = "session", description = "Viewer session endpoints"),
        (name = "feed", description = "Notification feed endpoints")
    )
)]
struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/session", session_routes())
        .nest("/feed", feed_routes());

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
