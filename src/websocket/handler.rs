use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::{broadcast, mpsc};

use crate::{
    error::{AppError, Result},
    state::AppState,
    websocket::types::{ChannelEvent, ErrorPayload, WsMessage},
};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Pushes feed changes and toasts out; accepts channel events (the relay
/// side) in.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    let mut feed_rx = state.feed.subscribe_feed();
    let mut toast_rx = state.feed.subscribe_toasts();
    let forward_tx = tx.clone();
    let mut forward_task = tokio::spawn(async move {
        loop {
            let message = tokio::select! {
                event = feed_rx.recv() => match event {
                    Ok(event) => WsMessage::Feed(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("WebSocket client lagged by {} feed events", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                toast = toast_rx.recv() => match toast {
                    Ok(toast) => WsMessage::Toast(toast),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };
            if forward_tx.send(message).is_err() {
                break;
            }
        }
    });

    // Spawn task to send messages from channel to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    // Spawn task to receive messages from WebSocket
    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Text(text) = msg {
                if let Err(e) = process_client_message(&text, &state_clone) {
                    tracing::error!("Error processing message: {:?}", e);
                    let error_msg = WsMessage::Error(ErrorPayload {
                        message: e.to_string(),
                    });
                    let _ = tx.send(error_msg);
                }
            } else if let Message::Close(_) = msg {
                break;
            }
        }
    });

    // Wait for any task to finish
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
            forward_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
            forward_task.abort();
        }
        _ = &mut forward_task => {
            send_task.abort();
            recv_task.abort();
        }
    }

    tracing::info!("WebSocket connection closed");
}

/// Relay an inbound channel event to every registered handler
fn process_client_message(text: &str, state: &AppState) -> Result<()> {
    let event: ChannelEvent = serde_json::from_str(text)
        .map_err(|e| AppError::BadRequest(format!("Invalid message format: {}", e)))?;

    let name = event.name();
    let delivered = state.channel.emit(event);
    tracing::debug!("Relayed {} to {} handler(s)", name, delivered);

    Ok(())
}
