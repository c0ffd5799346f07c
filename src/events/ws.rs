//! WebSocket subscription endpoint.
//!
//! Server -> Client (JSON text frames):
//! ```json
//! {"kind": "new_survey", "survey_id": "...", "title": "...", "public_url": "..."}
//! {"kind": "new_response", "survey_id": "...", "response_id": "..."}
//! ```
//!
//! Frames sent by the client are ignored apart from Close.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::AppState;

/// GET /ws - Subscribe to survey events.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    // Subscribe before the upgrade completes so no event published after the
    // handshake is missed.
    let events = state.events.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, events))
}

async fn handle_socket(
    socket: WebSocket,
    mut events: tokio::sync::broadcast::Receiver<super::SurveyEvent>,
) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let subscriber_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(%subscriber_id, "Event subscriber connected");

    // Watch the client side so a Close frame ends the forwarding loop.
    let mut reader = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            received = events.recv() => match received {
                Ok(event) => {
                    let payload = match serde_json::to_string(&event) {
                        Ok(payload) => payload,
                        Err(e) => {
                            tracing::warn!("Failed to encode event: {}", e);
                            continue;
                        }
                    };
                    if ws_sender.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(%subscriber_id, skipped, "Event subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            },
            _ = &mut reader => break,
        }
    }

    reader.abort();
    tracing::info!(%subscriber_id, "Event subscriber disconnected");
}
