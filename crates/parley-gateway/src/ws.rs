// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket handler bridging sockets to the router actor.
//!
//! Client -> Server frames are JSON [`ClientEvent`]s:
//! ```json
//! {"type": "join_queue", "zone": "SAV"}
//! {"type": "send_message", "room": "room_abc", "session_id": 7, "content": "hello"}
//! ```
//!
//! Server -> Client frames are JSON [`ServerEvent`]s pushed by the router.
//!
//! The token is verified before the upgrade (fail-closed); the connection is
//! registered with the router on upgrade and deregistered when the socket
//! task ends, whichever way it ends.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

use parley_core::{ClientEvent, ConnectionId, Identity, IdentityVerifier};
use parley_router::ConnectionHandle;

use crate::server::GatewayState;

/// Query parameters of the /ws handshake.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Session token from a login endpoint.
    token: String,
    /// Zone the client wants to queue in; ignored for operators.
    #[serde(default)]
    zone: Option<String>,
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<GatewayState>,
) -> Response {
    let identity = match state.signer.verify(&query.token) {
        Ok(identity) => identity,
        Err(e) => {
            debug!("websocket refused: {e}");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, identity, query.zone))
}

/// Pump one socket: a sender task forwards router events to the wire while
/// this task parses inbound frames into router commands.
async fn handle_socket(
    socket: WebSocket,
    state: GatewayState,
    identity: Identity,
    zone: Option<String>,
) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let id = ConnectionId(uuid::Uuid::new_v4().to_string());

    let (handle, mut rx) = ConnectionHandle::channel(id.clone());
    state.router.connect(id.clone(), identity, zone, handle).await;

    let sender_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("unserializable server event: {e}");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Text(text) => {
                let text_str: &str = &text;
                let event: ClientEvent = match serde_json::from_str(text_str) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("invalid WebSocket message: {e}");
                        continue;
                    }
                };
                state.router.event(id.clone(), event).await;
            }
            Message::Close(_) => break,
            _ => {} // Ignore binary; ping/pong handled by the protocol layer.
        }
    }

    // Transport gone: the lifecycle handler requeues or closes as needed.
    state.router.disconnect(id).await;
    sender_task.abort();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_query_deserializes_minimal() {
        let query: WsQuery = serde_json::from_str(r#"{"token": "abc.def"}"#).unwrap();
        assert_eq!(query.token, "abc.def");
        assert!(query.zone.is_none());
    }

    #[test]
    fn ws_query_deserializes_with_zone() {
        let query: WsQuery =
            serde_json::from_str(r#"{"token": "abc.def", "zone": "SAV"}"#).unwrap();
        assert_eq!(query.zone.as_deref(), Some("SAV"));
    }
}
