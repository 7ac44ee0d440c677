// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire events exchanged between connections and the routing core.
//!
//! Both enums are externally tagged with a `type` field so the browser side
//! can dispatch on a single discriminator:
//!
//! ```json
//! {"type": "join_queue", "zone": "SAV"}
//! {"type": "queue_snapshot", "entries": [{"connection_id": "...", "name": "Alice", "zone": "SAV"}]}
//! ```
//!
//! Delivery is in-order per connection and at-most-once per physical
//! connection; replay across reconnects is the reconnection resolver's job.

use serde::{Deserialize, Serialize};

/// Events a connection sends to the core. All are fire-and-forget from the
/// caller's perspective; failures surface as [`ServerEvent`]s on the same
/// connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Client asks to (re)enter the waiting queue for a zone. Idempotent:
    /// repeated calls keep a single entry with the most recent zone.
    JoinQueue { zone: String },
    /// Operator picks a waiting client by connection id.
    PickClient { connection_id: String },
    /// Chat message into a room.
    SendMessage {
        room: String,
        session_id: i64,
        content: String,
    },
    /// Reader signals it has seen the other side's messages.
    MarkRead { room: String, session_id: i64 },
    /// Source operator proposes handing the session to another operator.
    TransferPropose {
        session_id: i64,
        room: String,
        target_login: String,
    },
    /// Target operator confirms a proposed transfer.
    TransferAccept { session_id: i64, room: String },
    /// Flag the session for moderator review.
    Report {
        session_id: i64,
        room: String,
        reason: String,
        zone: String,
    },
    /// End the session and prompt the client for a rating.
    Finish { session_id: i64, room: String },
    /// Client closes its window deliberately (distinct from transport loss).
    Leaving {
        #[serde(default)]
        room: Option<String>,
    },
    /// Typing indicator, relayed to the rest of the room, never persisted.
    Typing { room: String, active: bool },
}

/// A waiting-queue entry as shown to operators and queued clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntryView {
    pub connection_id: String,
    pub name: String,
    pub zone: String,
}

/// A message as replayed in a history recap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    pub sender: String,
    pub content: String,
    pub is_operator: bool,
    #[serde(default)]
    pub read_at: Option<String>,
    pub created_at: String,
}

/// Events the core pushes to connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Full ordered waiting list, broadcast to operators and waiting clients.
    QueueSnapshot { entries: Vec<QueueEntryView> },
    /// Aggregate counters for operator dashboards.
    StatsSnapshot { waiting: usize, active_rooms: usize },
    /// A session was created and its room formed.
    SessionStarted {
        operator: String,
        room: String,
        session_id: i64,
        zone: String,
    },
    /// The session's operator changed after an accepted transfer.
    OperatorChanged { operator: String, room: String },
    /// A chat or system message delivered into a room.
    Message {
        sender: String,
        content: String,
        room: String,
        system: bool,
    },
    /// The other party's read boundary advanced.
    MessagesRead { room: String, at: String },
    /// A transfer was proposed to this operator.
    TransferRequested {
        room: String,
        session_id: i64,
        client_name: String,
        zone: String,
    },
    /// A transfer proposal could not be delivered; no session mutation
    /// happened.
    TransferFailed { session_id: i64, reason: String },
    /// The other side of the room is gone; the window should close.
    RoomClosed { room: String },
    /// This client was pushed back onto the waiting queue.
    Requeued { zone: String },
    /// Reconnection resolution found a still-open session for this client.
    ActiveSessionInfo { session_id: i64, room: String },
    /// Delayed redelivery of the full message history.
    HistoryRecap {
        room: String,
        session_id: i64,
        messages: Vec<MessageView>,
    },
    /// The session ended; the client should be prompted for a rating.
    RequestRating { session_id: i64 },
    /// Typing indicator relayed from the other side of the room.
    Typing {
        room: String,
        sender: String,
        active: bool,
    },
    /// A per-operation failure surfaced to the requesting connection.
    ErrorNotice { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_event_deserializes_from_tagged_json() {
        let ev: ClientEvent =
            serde_json::from_str(r#"{"type": "join_queue", "zone": "SAV"}"#).unwrap();
        assert_eq!(ev, ClientEvent::JoinQueue { zone: "SAV".into() });

        let ev: ClientEvent = serde_json::from_str(
            r#"{"type": "send_message", "room": "room_1", "session_id": 7, "content": "hi"}"#,
        )
        .unwrap();
        match ev {
            ClientEvent::SendMessage { session_id, .. } => assert_eq!(session_id, 7),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn leaving_defaults_room_to_none() {
        let ev: ClientEvent = serde_json::from_str(r#"{"type": "leaving"}"#).unwrap();
        assert_eq!(ev, ClientEvent::Leaving { room: None });
    }

    #[test]
    fn server_event_serializes_with_type_tag() {
        let ev = ServerEvent::Requeued { zone: "SAV".into() };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains(r#""type":"requeued""#));
        assert!(json.contains(r#""zone":"SAV""#));
    }

    #[test]
    fn queue_snapshot_round_trips() {
        let ev = ServerEvent::QueueSnapshot {
            entries: vec![QueueEntryView {
                connection_id: "c-1".into(),
                name: "Alice".into(),
                zone: "SAV".into(),
            }],
        };
        let json = serde_json::to_string(&ev).unwrap();
        let back: ServerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ev);
    }
}
