// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authoritative in-memory view of every non-closed session.
//!
//! Backed by the persistent store: records enter on assignment or when the
//! reconnection resolver re-reads an open session, and leave on closure.
//! The registry never outlives the store's truth -- persistence happens
//! before the in-memory mutation is considered committed.

use std::collections::HashMap;

use tracing::debug;

use parley_core::types::Session;

/// States in the session lifecycle.
///
/// `Transferring` covers the handshake window between a transfer proposal
/// and its acceptance; the session still has exactly one authoritative
/// operator (the one recorded in the store).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Transferring,
    Closed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Active => write!(f, "active"),
            SessionState::Transferring => write!(f, "transferring"),
            SessionState::Closed => write!(f, "closed"),
        }
    }
}

/// In-memory record of one open session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: i64,
    pub client_name: String,
    pub operator_login: String,
    pub zone: String,
    pub room_id: String,
    pub state: SessionState,
}

/// Registry of open sessions, keyed by store-assigned id.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<i64, SessionRecord>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: SessionRecord) {
        debug!(session_id = record.id, state = %record.state, "session registered");
        self.sessions.insert(record.id, record);
    }

    /// Re-enter an open session read back from the store (reconnection
    /// path). Keeps an existing record's state if already present.
    pub fn upsert_open(&mut self, session: &Session) {
        self.sessions
            .entry(session.id)
            .or_insert_with(|| SessionRecord {
                id: session.id,
                client_name: session.client_name.clone(),
                operator_login: session.operator_login.clone(),
                zone: session.zone.clone(),
                room_id: session.room_id.clone(),
                state: SessionState::Active,
            });
    }

    pub fn get(&self, id: i64) -> Option<&SessionRecord> {
        self.sessions.get(&id)
    }

    pub fn set_state(&mut self, id: i64, state: SessionState) {
        if let Some(record) = self.sessions.get_mut(&id) {
            debug!(session_id = id, from = %record.state, to = %state, "session state change");
            record.state = state;
        }
    }

    /// Record the new operator after an accepted transfer and return the
    /// session to `Active`.
    pub fn set_operator(&mut self, id: i64, operator_login: &str) {
        if let Some(record) = self.sessions.get_mut(&id) {
            record.operator_login = operator_login.to_string();
            record.state = SessionState::Active;
        }
    }

    /// Drop a session that reached its terminal state.
    pub fn close(&mut self, id: i64) {
        if self.sessions.remove(&id).is_some() {
            debug!(session_id = id, "session closed");
        }
    }

    /// Session owning the given room, if any.
    pub fn by_room(&self, room_id: &str) -> Option<&SessionRecord> {
        self.sessions.values().find(|s| s.room_id == room_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, room: &str) -> SessionRecord {
        SessionRecord {
            id,
            client_name: "Alice".into(),
            operator_login: "bob".into(),
            zone: "SAV".into(),
            room_id: room.into(),
            state: SessionState::Active,
        }
    }

    #[test]
    fn state_display() {
        assert_eq!(SessionState::Active.to_string(), "active");
        assert_eq!(SessionState::Transferring.to_string(), "transferring");
        assert_eq!(SessionState::Closed.to_string(), "closed");
    }

    #[test]
    fn insert_get_close() {
        let mut registry = SessionRegistry::new();
        registry.insert(record(1, "room_a"));
        assert_eq!(registry.get(1).unwrap().operator_login, "bob");

        registry.close(1);
        assert!(registry.get(1).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn set_operator_returns_to_active() {
        let mut registry = SessionRegistry::new();
        registry.insert(record(1, "room_a"));
        registry.set_state(1, SessionState::Transferring);
        assert_eq!(registry.get(1).unwrap().state, SessionState::Transferring);

        registry.set_operator(1, "eve");
        let session = registry.get(1).unwrap();
        assert_eq!(session.operator_login, "eve");
        assert_eq!(session.state, SessionState::Active);
    }

    #[test]
    fn by_room_finds_owner() {
        let mut registry = SessionRegistry::new();
        registry.insert(record(1, "room_a"));
        registry.insert(record(2, "room_b"));
        assert_eq!(registry.by_room("room_b").unwrap().id, 2);
        assert!(registry.by_room("room_zzz").is_none());
    }

    #[test]
    fn upsert_open_keeps_existing_state() {
        let mut registry = SessionRegistry::new();
        let mut rec = record(1, "room_a");
        rec.state = SessionState::Transferring;
        registry.insert(rec);

        let from_store = Session {
            id: 1,
            client_name: "Alice".into(),
            operator_login: "bob".into(),
            zone: "SAV".into(),
            room_id: "room_a".into(),
            reported: false,
            report_reason: None,
            rating: None,
            internal_notes: None,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        registry.upsert_open(&from_store);
        assert_eq!(registry.get(1).unwrap().state, SessionState::Transferring);
    }
}
