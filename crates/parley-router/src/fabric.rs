// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process multicast fabric: per-connection handles and named rooms.
//!
//! Each live connection is represented by a [`ConnectionHandle`] wrapping a
//! bounded mpsc sender; the transport side (WebSocket task, test harness)
//! owns the receiving half and forwards events onto the wire. A room groups
//! exactly the client and current operator of one session.
//!
//! Sends never block: the router actor must not suspend on a slow consumer,
//! so a full buffer drops the event (delivery is at-most-once per physical
//! connection by design).

use std::collections::{HashMap, HashSet};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use parley_core::{ConnectionId, ServerEvent};

/// Buffered events per connection before sends start dropping.
pub const CONNECTION_BUFFER: usize = 64;

/// Addressable send-side of one connection.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    tx: mpsc::Sender<ServerEvent>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, tx: mpsc::Sender<ServerEvent>) -> Self {
        Self { id, tx }
    }

    /// Create a handle together with the receiving half for the transport.
    pub fn channel(id: ConnectionId) -> (Self, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(CONNECTION_BUFFER);
        (Self { id, tx }, rx)
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// True once the transport side has dropped its receiver. Used to
    /// re-validate a connection after a persistence await.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Non-blocking send. A full or closed buffer drops the event with a log
    /// line; the disconnect path will clean the connection up.
    pub fn send(&self, event: ServerEvent) {
        if let Err(e) = self.tx.try_send(event) {
            warn!(connection_id = %self.id, "dropping event for connection: {e}");
        }
    }
}

/// Registry of connection handles and room membership.
#[derive(Default)]
pub struct Fabric {
    handles: HashMap<ConnectionId, ConnectionHandle>,
    rooms: HashMap<String, HashSet<ConnectionId>>,
}

impl Fabric {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly connected handle, replacing any stale one under
    /// the same id.
    pub fn register(&mut self, handle: ConnectionHandle) {
        self.handles.insert(handle.id().clone(), handle);
    }

    /// Drop the handle and remove the connection from every room. Rooms
    /// left empty are forgotten.
    pub fn unregister(&mut self, id: &ConnectionId) {
        self.handles.remove(id);
        self.rooms.retain(|_, members| {
            members.remove(id);
            !members.is_empty()
        });
    }

    pub fn is_connected(&self, id: &ConnectionId) -> bool {
        self.handles.contains_key(id)
    }

    pub fn handle(&self, id: &ConnectionId) -> Option<&ConnectionHandle> {
        self.handles.get(id)
    }

    /// Join a connection to a room. Idempotent.
    pub fn join(&mut self, room: &str, id: &ConnectionId) {
        if !self.handles.contains_key(id) {
            debug!(room, connection_id = %id, "join ignored for unknown connection");
            return;
        }
        self.rooms
            .entry(room.to_string())
            .or_default()
            .insert(id.clone());
    }

    /// Remove a connection from one room.
    pub fn leave(&mut self, room: &str, id: &ConnectionId) {
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(id);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }
    }

    pub fn members(&self, room: &str) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Rooms this connection currently belongs to.
    pub fn rooms_of(&self, id: &ConnectionId) -> Vec<String> {
        self.rooms
            .iter()
            .filter(|(_, members)| members.contains(id))
            .map(|(room, _)| room.clone())
            .collect()
    }

    /// Send to a single connection if it is registered.
    pub fn send(&self, id: &ConnectionId, event: ServerEvent) {
        if let Some(handle) = self.handles.get(id) {
            handle.send(event);
        }
    }

    /// Send to every member of a room.
    pub fn broadcast(&self, room: &str, event: &ServerEvent) {
        if let Some(members) = self.rooms.get(room) {
            for id in members {
                self.send(id, event.clone());
            }
        }
    }

    /// Send to every member of a room except one connection.
    pub fn broadcast_except(&self, room: &str, except: &ConnectionId, event: &ServerEvent) {
        if let Some(members) = self.rooms.get(room) {
            for id in members.iter().filter(|id| *id != except) {
                self.send(id, event.clone());
            }
        }
    }

    /// Send to every registered connection.
    pub fn broadcast_all(&self, event: &ServerEvent) {
        for handle in self.handles.values() {
            handle.send(event.clone());
        }
    }

    /// Number of rooms with at least one member.
    pub fn active_room_count(&self) -> usize {
        self.rooms.values().filter(|m| !m.is_empty()).count()
    }
}
