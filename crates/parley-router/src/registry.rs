// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection registry: who is online, as what, and where.
//!
//! Maps each live connection to its verified identity and per-connection
//! metadata (current zone, bound session), and keeps the operator login →
//! connection index used by the transfer protocol.

use std::collections::HashMap;

use tracing::debug;

use parley_core::{ConnectionId, Identity, Role};

/// Per-connection metadata. Ephemeral: created on connect, destroyed on
/// disconnect.
#[derive(Debug, Clone)]
pub struct ConnectionMeta {
    pub identity: Identity,
    /// Last zone the client asked to queue in.
    pub zone: Option<String>,
    /// Session this connection is currently bound to.
    pub session_id: Option<i64>,
}

/// Registry of online connections.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, ConnectionMeta>,
    /// login -> most recent connection for that operator. A reconnect
    /// replaces the stale entry; events are never delivered into a dead
    /// connection handle via this index.
    operators: HashMap<String, ConnectionId>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a connection. For operators the login index is refreshed to
    /// point at this connection.
    pub fn insert(&mut self, id: ConnectionId, identity: Identity) {
        if identity.role == Role::Operator {
            if let Some(login) = &identity.login {
                self.operators.insert(login.clone(), id.clone());
            }
        }
        self.connections.insert(
            id,
            ConnectionMeta {
                identity,
                zone: None,
                session_id: None,
            },
        );
    }

    /// Remove a connection, returning its metadata. The operator index is
    /// cleared only if it still points at this connection (a newer login
    /// may have taken over).
    pub fn remove(&mut self, id: &ConnectionId) -> Option<ConnectionMeta> {
        let meta = self.connections.remove(id)?;
        if let Some(login) = &meta.identity.login {
            if self.operators.get(login) == Some(id) {
                self.operators.remove(login);
                debug!(login = %login, "operator went offline");
            }
        }
        Some(meta)
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&ConnectionMeta> {
        self.connections.get(id)
    }

    pub fn get_mut(&mut self, id: &ConnectionId) -> Option<&mut ConnectionMeta> {
        self.connections.get_mut(id)
    }

    /// Current connection for an online operator login.
    pub fn operator_connection(&self, login: &str) -> Option<&ConnectionId> {
        self.operators.get(login)
    }

    /// Logins of all online operators, with their connection ids.
    pub fn online_operators(&self) -> impl Iterator<Item = (&String, &ConnectionId)> {
        self.operators.iter()
    }

    /// Bind a session id to a connection. No-op if the connection is gone.
    pub fn set_session(&mut self, id: &ConnectionId, session_id: i64) {
        if let Some(meta) = self.connections.get_mut(id) {
            meta.session_id = Some(session_id);
        }
    }

    /// Record the zone a client queued in.
    pub fn set_zone(&mut self, id: &ConnectionId, zone: &str) {
        if let Some(meta) = self.connections.get_mut(id) {
            meta.zone = Some(zone.to_string());
        }
    }
}
