//! WebSocket connection handler
//!
//! Clients both feed telemetry (`entry` / `bulk_entry`) and receive observer
//! notifications pushed after each drain cycle.

use std::sync::Arc;
use axum::{
    extract::{ws::{Message, WebSocket, WebSocketUpgrade}, State},
    response::Response,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::events::{AckMessage, ClientMessage, PongMessage, WelcomeMessage};
use super::state::AppState;
use crate::types::{RawBatch, RawEntry};

type WsSink = SplitSink<WebSocket, Message>;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sink, mut stream) = socket.split();
    let mut rx = state.subscribe();

    let welcome = WelcomeMessage::new(state.current_sequence_id());
    if send_json(&mut sink, &welcome).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(msg) => {
                        if send_json(&mut sink, &msg).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // the client should re-read state over REST
                        let error_msg = serde_json::json!({
                            "type": "error",
                            "code": "lagged",
                            "message": format!("Missed {} events, please refresh", n)
                        });
                        let _ = send_json(&mut sink, &error_msg).await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            result = stream.next() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut sink, &state).await {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "websocket error");
                        break;
                    }
                    None => break,
                }
            }
        }
    }
    debug!("websocket client disconnected");
}

async fn send_json<T: Serialize>(sink: &mut WsSink, value: &T) -> Result<(), axum::Error> {
    match serde_json::to_string(value) {
        Ok(json) => sink.send(Message::Text(json)).await,
        Err(e) => {
            warn!(error = %e, "failed to serialize websocket message");
            Ok(())
        }
    }
}

/// Handle a message from the client
/// Returns false if the connection should be closed
async fn handle_client_message(msg: Message, sink: &mut WsSink, state: &AppState) -> bool {
    match msg {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Entry { stream, line }) => {
                    state.pipeline.receive_one(&RawEntry { stream, line });
                }
                Ok(ClientMessage::BulkEntry { stream, lines }) => {
                    let report = state.pipeline.receive_batch(&RawBatch { stream, lines });
                    let ack = AckMessage::new(report.accepted, report.rejected);
                    let _ = send_json(sink, &ack).await;
                }
                Ok(ClientMessage::Ping) => {
                    let _ = send_json(sink, &PongMessage::default()).await;
                }
                Err(e) => debug!(error = %e, "ignoring unparseable client message"),
            }
            true
        }
        Message::Binary(_) => true,
        Message::Ping(data) => {
            let _ = sink.send(Message::Pong(data)).await;
            true
        }
        Message::Pong(_) => true,
        Message::Close(_) => false,
    }
}
