// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Parley workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a live connection. Ephemeral: created on connect,
/// destroyed on disconnect, never reused for reconnection resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub String);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role carried by a verified credential.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Operator,
}

/// Verified identity attached to a connection.
///
/// `login` is set only for operators and is stable across reconnects.
/// Clients have no durable id; their reconnection is resolved by display
/// name against the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub role: Role,
    pub display_name: String,
    #[serde(default)]
    pub login: Option<String>,
}

impl Identity {
    pub fn client(display_name: impl Into<String>) -> Self {
        Self {
            role: Role::Client,
            display_name: display_name.into(),
            login: None,
        }
    }

    pub fn operator(login: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            role: Role::Operator,
            display_name: display_name.into(),
            login: Some(login.into()),
        }
    }
}

/// A client waiting to be assigned an operator.
///
/// Lives only in the waiting queue; unique per connection id. Zone is
/// carried as metadata, not an ordering partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingEntry {
    pub connection_id: ConnectionId,
    pub display_name: String,
    pub zone: String,
}

/// Durable record of one client-operator conversation, from assignment
/// to rating.
///
/// `rating` is `None` while the session is open; once set, the session is
/// terminal and excluded from active-session lookups. `room_id` is recorded
/// at creation so reconnection resolution never depends on connection-id
/// reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub client_name: String,
    pub operator_login: String,
    pub zone: String,
    pub room_id: String,
    pub reported: bool,
    pub report_reason: Option<String>,
    pub rating: Option<i64>,
    pub internal_notes: Option<String>,
    pub created_at: String,
}

/// A persisted chat message. Append-only; `read_at` is set exactly once,
/// by the read-receipt tracker, never by the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub session_id: i64,
    pub sender_name: String,
    pub content: String,
    pub is_operator: bool,
    pub read_at: Option<String>,
    pub created_at: String,
}

/// An operator account row. Account CRUD lives outside the core; the
/// gateway only reads these for credential verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub username: String,
    pub display_name: Option<String>,
    pub password_hash: String,
}

impl Operator {
    /// Display name falling back to the login, mirroring how operators are
    /// presented in rosters.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// Sender name used for synthetic system messages.
pub const SYSTEM_SENDER: &str = "System";
