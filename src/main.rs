mod error;
mod notification;
mod routes;
mod session;
mod state;
mod websocket;

use notification::{FeedController, NotificationRepository};
use routes::create_router;
use state::{AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use websocket::RealtimeChannel;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,shutter_notify=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Using backend at {}", config.api_url);

    // Shared realtime channel, one per process
    let channel = RealtimeChannel::new();

    let notification_repository =
        NotificationRepository::new(&config.api_url, config.request_timeout)?;
    let feed = FeedController::new(
        notification_repository,
        channel.clone(),
        config.reconcile_unread,
    );

    if let Some(viewer_id) = config.initial_viewer_id.clone() {
        feed.set_viewer(viewer_id).await;
    }

    let state = AppState {
        channel,
        feed: feed.clone(),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    feed.end_session().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
}
