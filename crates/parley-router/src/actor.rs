// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The router actor: one task owning all routing state.
//!
//! Every mutation of the connection registry, waiting queue, session
//! registry, and room fabric happens inside this actor's `run` loop, one
//! command at a time. Persistence calls are the only suspension points;
//! any decision made from state read before such a call is re-validated
//! after it (a connection's transport can die at any moment, observable
//! through its handle, even while its Disconnect command is still queued).
//!
//! Delayed history redelivery runs on spawned timer tasks that only read
//! storage and send through a captured connection handle; they never touch
//! actor state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use parley_core::{
    ClientEvent, ConnectionId, Identity, MessageView, Role, ServerEvent, StorageAdapter,
    WaitingEntry, SYSTEM_SENDER,
};

use crate::commands::RouterCommand;
use crate::fabric::{ConnectionHandle, Fabric};
use crate::handle::RouterHandle;
use crate::queue::WaitingQueue;
use crate::registry::ConnectionRegistry;
use crate::sessions::{SessionRecord, SessionRegistry, SessionState};

/// Commands buffered before submitters start waiting.
const COMMAND_CAPACITY: usize = 256;

/// Tunables for the routing engine.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Delay before redelivering message history to a freshly joined
    /// operator, giving its UI time to mount.
    pub history_replay_delay: Duration,
    /// Placeholder rating recorded when a session is closed by
    /// disconnection rather than an explicit score.
    pub abandon_rating: i64,
    /// Zone used when a requeued client's zone cannot be resolved.
    pub default_zone: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            history_replay_delay: Duration::from_millis(500),
            abandon_rating: 1,
            default_zone: "General".to_string(),
        }
    }
}

/// Single-writer owner of all routing state.
pub struct RouterActor {
    storage: Arc<dyn StorageAdapter>,
    config: RouterConfig,
    fabric: Fabric,
    registry: ConnectionRegistry,
    queue: WaitingQueue,
    sessions: SessionRegistry,
    rx: mpsc::Receiver<RouterCommand>,
}

impl RouterActor {
    /// Spawn the actor task. Returns the handle for submitting commands and
    /// the task's JoinHandle.
    pub fn spawn(
        storage: Arc<dyn StorageAdapter>,
        config: RouterConfig,
    ) -> (RouterHandle, tokio::task::JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
        let actor = Self {
            storage,
            config,
            fabric: Fabric::new(),
            registry: ConnectionRegistry::new(),
            queue: WaitingQueue::new(),
            sessions: SessionRegistry::new(),
            rx,
        };
        let handle = tokio::spawn(actor.run());
        (RouterHandle::new(tx), handle)
    }

    async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            self.handle_command(command).await;
        }
        debug!("router actor stopped");
    }

    async fn handle_command(&mut self, command: RouterCommand) {
        match command {
            RouterCommand::Connect {
                id,
                identity,
                zone,
                handle,
            } => self.handle_connect(id, identity, zone, handle).await,
            RouterCommand::Disconnect { id } => self.handle_disconnect(id).await,
            RouterCommand::Event { id, event } => match event {
                ClientEvent::JoinQueue { zone } => self.handle_join_queue(&id, &zone),
                ClientEvent::PickClient { connection_id } => {
                    self.handle_pick(id, ConnectionId(connection_id)).await
                }
                ClientEvent::SendMessage {
                    room,
                    session_id,
                    content,
                } => self.handle_send_message(id, room, session_id, content).await,
                ClientEvent::MarkRead { room, session_id } => {
                    self.handle_mark_read(id, room, session_id).await
                }
                ClientEvent::TransferPropose {
                    session_id,
                    room,
                    target_login,
                } => self.handle_transfer_propose(id, session_id, room, target_login),
                ClientEvent::TransferAccept { session_id, room } => {
                    self.handle_transfer_accept(id, session_id, room).await
                }
                ClientEvent::Report {
                    session_id,
                    room,
                    reason,
                    zone,
                } => self.handle_report(id, session_id, room, reason, zone).await,
                ClientEvent::Finish { session_id, room } => {
                    self.handle_finish(id, session_id, room).await
                }
                ClientEvent::Leaving { room } => self.handle_leaving(&id, room),
                ClientEvent::Typing { room, active } => self.handle_typing(&id, room, active),
            },
            RouterCommand::OnlineOperators { reply } => {
                let logins = self
                    .registry
                    .online_operators()
                    .map(|(login, _)| login.clone())
                    .collect();
                let _ = reply.send(logins);
            }
        }
    }

    // --- Connect / reconnection resolution -------------------------------

    async fn handle_connect(
        &mut self,
        id: ConnectionId,
        identity: Identity,
        zone: Option<String>,
        handle: ConnectionHandle,
    ) {
        info!(
            connection_id = %id,
            role = %identity.role,
            name = %identity.display_name,
            "connection online"
        );
        self.fabric.register(handle);
        self.registry.insert(id.clone(), identity.clone());

        match identity.role {
            Role::Operator => {
                self.fabric.send(
                    &id,
                    ServerEvent::QueueSnapshot {
                        entries: self.queue.snapshot(),
                    },
                );
                self.broadcast_stats();
            }
            Role::Client => {
                // Active-session info goes out before any queue traffic so
                // the client UI can suppress the queueing view.
                self.resolve_reconnection(&id, &identity.display_name).await;
                if let Some(zone) = zone {
                    // Deliberately redundant: if an operator still owns the
                    // old room the entry sits harmlessly until consumed, and
                    // it covers the orphaned-session case.
                    self.enqueue_client(&id, &identity.display_name, &zone);
                }
            }
        }
    }

    /// Re-bind a (re)connected client to its most recent open session, if
    /// any. Tolerates first-time visitors, stale duplicates (most recent
    /// wins), and rooms with no remaining operator (the queue entry added
    /// by the caller covers that).
    async fn resolve_reconnection(&mut self, id: &ConnectionId, display_name: &str) {
        let session = match self
            .storage
            .find_open_session_by_client_name(display_name)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, name = %display_name, "reconnection lookup failed");
                return;
            }
        };
        let Some(session) = session else {
            return; // first-time visitor: ordinary queue join
        };
        // Re-validate after the persistence await.
        if !self.fabric.is_connected(id) {
            return;
        }

        info!(
            connection_id = %id,
            session_id = session.id,
            room = %session.room_id,
            "reconnected client re-bound to open session"
        );
        self.registry.set_session(id, session.id);
        self.sessions.upsert_open(&session);
        // Room identity comes from the session record, never re-derived
        // from the (new) connection id.
        self.fabric.join(&session.room_id, id);
        self.fabric.send(
            id,
            ServerEvent::ActiveSessionInfo {
                session_id: session.id,
                room: session.room_id,
            },
        );
    }

    // --- Waiting queue ----------------------------------------------------

    fn handle_join_queue(&mut self, id: &ConnectionId, zone: &str) {
        let Some(meta) = self.registry.get(id) else {
            return;
        };
        let name = meta.identity.display_name.clone();
        self.enqueue_client(id, &name, zone);
    }

    fn enqueue_client(&mut self, id: &ConnectionId, name: &str, zone: &str) {
        let Some(meta) = self.registry.get(id) else {
            return;
        };
        if meta.identity.role != Role::Client {
            debug!(connection_id = %id, "queue join ignored for non-client");
            return;
        }
        self.registry.set_zone(id, zone);
        self.queue.enqueue(WaitingEntry {
            connection_id: id.clone(),
            display_name: name.to_string(),
            zone: zone.to_string(),
        });
        debug!(connection_id = %id, zone = %zone, "client waiting");
        self.broadcast_queue();
        self.broadcast_stats();
    }

    // --- Assignment engine -------------------------------------------------

    async fn handle_pick(&mut self, operator_id: ConnectionId, client_id: ConnectionId) {
        // Lookup, role check, and queue removal run without an intervening
        // suspension point: no other assignment can claim this entry.
        let Some(op_meta) = self.registry.get(&operator_id) else {
            return;
        };
        if op_meta.identity.role != Role::Operator {
            warn!(connection_id = %operator_id, "pick rejected for non-operator");
            return;
        }
        let Some(op_login) = op_meta.identity.login.clone() else {
            return;
        };
        let op_display = op_meta.identity.display_name.clone();

        let Some(entry) = self.queue.remove(&client_id) else {
            // The client vanished meanwhile: never assign a ghost.
            debug!(connection_id = %client_id, "pick on absent waiting entry");
            self.fabric.send(
                &operator_id,
                ServerEvent::ErrorNotice {
                    message: "this client is no longer waiting".to_string(),
                },
            );
            return;
        };

        let client_handle = match self.fabric.handle(&client_id) {
            Some(handle) if !handle.is_closed() => handle.clone(),
            _ => {
                self.fabric.send(
                    &operator_id,
                    ServerEvent::ErrorNotice {
                        message: "this client is unavailable".to_string(),
                    },
                );
                self.broadcast_queue();
                self.broadcast_stats();
                return;
            }
        };

        // A session bound by the reconnection resolver carries the prior
        // conversation; it is replayed to the operator below.
        let recap_session = self.registry.get(&client_id).and_then(|m| m.session_id);

        let room_id = format!("room_{}", client_id.0);
        let session_id = match self
            .storage
            .create_session(&entry.display_name, &op_login, &entry.zone, &room_id)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "session creation failed; assignment aborted");
                // The removal above is not committed without the session row.
                self.queue.enqueue(entry);
                self.fabric.send(
                    &operator_id,
                    ServerEvent::ErrorNotice {
                        message: "the session could not be started".to_string(),
                    },
                );
                self.broadcast_queue();
                return;
            }
        };

        // Re-validate: the client may have dropped during the round-trip.
        if client_handle.is_closed() || !self.fabric.is_connected(&client_id) {
            warn!(session_id, "client vanished during assignment; aborting");
            if let Err(e) = self
                .storage
                .close_session(session_id, self.config.abandon_rating)
                .await
            {
                warn!(error = %e, session_id, "orphan session cleanup failed");
            }
            self.fabric.send(
                &operator_id,
                ServerEvent::ErrorNotice {
                    message: "this client is unavailable".to_string(),
                },
            );
            self.broadcast_queue();
            self.broadcast_stats();
            return;
        }

        self.registry.set_session(&operator_id, session_id);
        self.registry.set_session(&client_id, session_id);
        self.sessions.insert(SessionRecord {
            id: session_id,
            client_name: entry.display_name.clone(),
            operator_login: op_login.clone(),
            zone: entry.zone.clone(),
            room_id: room_id.clone(),
            state: SessionState::Active,
        });

        self.fabric.join(&room_id, &operator_id);
        self.fabric.join(&room_id, &client_id);
        self.fabric.broadcast(
            &room_id,
            &ServerEvent::SessionStarted {
                operator: op_display.clone(),
                room: room_id.clone(),
                session_id,
                zone: entry.zone.clone(),
            },
        );

        // Synthetic join marker, persisted before it is shown.
        let joined = format!("{op_display} joined the conversation.");
        match self
            .storage
            .append_message(session_id, SYSTEM_SENDER, &joined, true)
            .await
        {
            Ok(()) => self.fabric.broadcast(
                &room_id,
                &ServerEvent::Message {
                    sender: SYSTEM_SENDER.to_string(),
                    content: joined,
                    room: room_id.clone(),
                    system: true,
                },
            ),
            Err(e) => warn!(error = %e, session_id, "join marker not persisted"),
        }

        // Replay the client's prior conversation once the operator UI has
        // mounted (reconnect-into-new-room case).
        if let Some(prior_session) = recap_session {
            if let Some(op_handle) = self.fabric.handle(&operator_id).cloned() {
                self.spawn_history_recap(op_handle, prior_session, room_id.clone(), session_id);
            }
        }

        info!(
            session_id,
            operator = %op_login,
            client = %entry.display_name,
            zone = %entry.zone,
            "session assigned"
        );
        self.broadcast_queue();
        self.broadcast_stats();
    }

    // --- Messaging ----------------------------------------------------------

    async fn handle_send_message(
        &mut self,
        id: ConnectionId,
        room: String,
        session_id: i64,
        content: String,
    ) {
        let Some(meta) = self.registry.get(&id) else {
            return;
        };
        let sender = meta.identity.display_name.clone();
        let is_operator = meta.identity.role == Role::Operator;

        // Persistence before broadcast: a message the store never accepted
        // is not shown as delivered.
        if let Err(e) = self
            .storage
            .append_message(session_id, &sender, &content, is_operator)
            .await
        {
            warn!(error = %e, session_id, "message not persisted; broadcast withheld");
            self.fabric.send(
                &id,
                ServerEvent::ErrorNotice {
                    message: "your message could not be delivered".to_string(),
                },
            );
            return;
        }
        self.fabric.broadcast(
            &room,
            &ServerEvent::Message {
                sender,
                content,
                room: room.clone(),
                system: false,
            },
        );
    }

    // --- Read receipts -------------------------------------------------------

    async fn handle_mark_read(&mut self, id: ConnectionId, room: String, session_id: i64) {
        let Some(meta) = self.registry.get(&id) else {
            return;
        };
        let reader_is_operator = meta.identity.role == Role::Operator;
        match self.storage.mark_read(session_id, reader_is_operator).await {
            // Nothing newly marked: idempotent no-op, no notification.
            Ok(0) => {}
            Ok(count) => {
                debug!(session_id, count, "read boundary advanced");
                let at = chrono::Utc::now().to_rfc3339();
                self.fabric.broadcast_except(
                    &room,
                    &id,
                    &ServerEvent::MessagesRead {
                        room: room.clone(),
                        at,
                    },
                );
            }
            Err(e) => warn!(error = %e, session_id, "mark_read failed"),
        }
    }

    // --- Transfer protocol ---------------------------------------------------

    /// Phase one: propose. No awaits, no session mutation on a dropped
    /// proposal. If the target never accepts, no operator owns the room
    /// until the client reconnects or a new pick occurs; that asymmetry is
    /// operational policy, surfaced to the source but not repaired here.
    fn handle_transfer_propose(
        &mut self,
        id: ConnectionId,
        session_id: i64,
        room: String,
        target_login: String,
    ) {
        let Some(meta) = self.registry.get(&id) else {
            return;
        };
        if meta.identity.role != Role::Operator {
            warn!(connection_id = %id, "transfer proposal rejected for non-operator");
            return;
        }
        let Some(session) = self.sessions.get(session_id) else {
            debug!(session_id, "transfer proposed for unknown session");
            self.fabric.send(
                &id,
                ServerEvent::TransferFailed {
                    session_id,
                    reason: "session not found".to_string(),
                },
            );
            return;
        };
        let client_name = session.client_name.clone();
        let zone = session.zone.clone();

        let target_handle = self
            .registry
            .operator_connection(&target_login)
            .and_then(|conn| self.fabric.handle(conn))
            .filter(|handle| !handle.is_closed())
            .cloned();
        let Some(target_handle) = target_handle else {
            info!(session_id, target = %target_login, "transfer target offline; proposal dropped");
            self.fabric.send(
                &id,
                ServerEvent::TransferFailed {
                    session_id,
                    reason: format!("operator {target_login} is offline"),
                },
            );
            return;
        };

        self.sessions.set_state(session_id, SessionState::Transferring);
        target_handle.send(ServerEvent::TransferRequested {
            room: room.clone(),
            session_id,
            client_name,
            zone,
        });
        self.fabric.broadcast(
            &room,
            &ServerEvent::Message {
                sender: SYSTEM_SENDER.to_string(),
                content: "Please hold on, you are being transferred to another operator..."
                    .to_string(),
                room: room.clone(),
                system: true,
            },
        );
    }

    /// Phase two: accept. The operator change and the transfer marker land
    /// in the store as one durable step before any notification, so a crash
    /// in between leaves the session record ahead of the UI, never behind.
    async fn handle_transfer_accept(&mut self, id: ConnectionId, session_id: i64, room: String) {
        let Some(meta) = self.registry.get(&id) else {
            return;
        };
        if meta.identity.role != Role::Operator {
            warn!(connection_id = %id, "transfer accept rejected for non-operator");
            return;
        }
        let Some(login) = meta.identity.login.clone() else {
            return;
        };
        let display = meta.identity.display_name.clone();

        let transfer_msg = format!("Conversation taken over by {display}.");
        match self
            .storage
            .record_transfer(session_id, &login, &transfer_msg)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(session_id, "transfer accepted for unknown session");
                self.fabric.send(
                    &id,
                    ServerEvent::ErrorNotice {
                        message: "this session no longer exists".to_string(),
                    },
                );
                return;
            }
            Err(e) => {
                warn!(error = %e, session_id, "transfer not recorded");
                self.fabric.send(
                    &id,
                    ServerEvent::ErrorNotice {
                        message: "the transfer could not be recorded".to_string(),
                    },
                );
                return;
            }
        }

        // Re-validate after the await: the store is already ahead, which is
        // the safe side; just skip the room plumbing if the acceptor died.
        if !self.fabric.is_connected(&id) {
            return;
        }

        // Exactly one operator owns the room once the handshake completes.
        for member in self.fabric.members(&room) {
            if member == id {
                continue;
            }
            if let Some(m) = self.registry.get(&member) {
                if m.identity.role == Role::Operator {
                    self.fabric.leave(&room, &member);
                }
            }
        }
        self.fabric.join(&room, &id);
        self.registry.set_session(&id, session_id);
        self.sessions.set_operator(session_id, &login);

        self.fabric.broadcast(
            &room,
            &ServerEvent::OperatorChanged {
                operator: display,
                room: room.clone(),
            },
        );
        self.fabric.broadcast(
            &room,
            &ServerEvent::Message {
                sender: SYSTEM_SENDER.to_string(),
                content: transfer_msg,
                room: room.clone(),
                system: true,
            },
        );

        // The new operator never starts blind.
        if let Some(handle) = self.fabric.handle(&id).cloned() {
            self.spawn_history_recap(handle, session_id, room.clone(), session_id);
        }
        info!(session_id, operator = %login, "transfer accepted");
    }

    // --- Reports and closure -------------------------------------------------

    async fn handle_report(
        &mut self,
        id: ConnectionId,
        session_id: i64,
        room: String,
        reason: String,
        zone: String,
    ) {
        let tagged_reason = format!("[Zone: {zone}] {reason}");
        if let Err(e) = self.storage.mark_reported(session_id, &tagged_reason).await {
            warn!(error = %e, session_id, "report not persisted");
            self.fabric.send(
                &id,
                ServerEvent::ErrorNotice {
                    message: "the report could not be recorded".to_string(),
                },
            );
            return;
        }
        warn!(session_id, zone = %zone, reason = %reason, "session reported");
        self.fabric.broadcast(
            &room,
            &ServerEvent::Message {
                sender: SYSTEM_SENDER.to_string(),
                content: format!(
                    "This conversation has been reported to the {zone} moderators. \
                     The transcript has been kept for review."
                ),
                room: room.clone(),
                system: true,
            },
        );
    }

    async fn handle_finish(&mut self, id: ConnectionId, session_id: i64, room: String) {
        match self
            .storage
            .close_session(session_id, self.config.abandon_rating)
            .await
        {
            Ok(changed) => {
                if !changed {
                    debug!(session_id, "finish on already-closed session");
                }
                self.sessions.close(session_id);
                self.fabric
                    .broadcast(&room, &ServerEvent::RequestRating { session_id });
                self.fabric.broadcast(
                    &room,
                    &ServerEvent::Message {
                        sender: SYSTEM_SENDER.to_string(),
                        content: "The session has ended. Please rate your conversation."
                            .to_string(),
                        room: room.clone(),
                        system: true,
                    },
                );
            }
            Err(e) => {
                warn!(error = %e, session_id, "session close failed");
                self.fabric.send(
                    &id,
                    ServerEvent::ErrorNotice {
                        message: "the session could not be closed".to_string(),
                    },
                );
            }
        }
    }

    fn handle_leaving(&mut self, id: &ConnectionId, room: Option<String>) {
        if let Some(room) = room {
            self.fabric
                .broadcast_except(&room, id, &ServerEvent::RoomClosed { room: room.clone() });
        }
        self.queue.remove(id);
        self.broadcast_queue();
        self.broadcast_stats();
    }

    fn handle_typing(&mut self, id: &ConnectionId, room: String, active: bool) {
        let Some(meta) = self.registry.get(id) else {
            return;
        };
        let sender = meta.identity.display_name.clone();
        self.fabric.broadcast_except(
            &room,
            id,
            &ServerEvent::Typing {
                room: room.clone(),
                sender,
                active,
            },
        );
    }

    // --- Disconnect lifecycle ------------------------------------------------

    async fn handle_disconnect(&mut self, id: ConnectionId) {
        let Some(meta) = self.registry.remove(&id) else {
            self.fabric.unregister(&id);
            return;
        };
        info!(connection_id = %id, role = %meta.identity.role, "connection offline");
        self.queue.remove(&id);

        match meta.identity.role {
            Role::Operator => {
                // Every room this operator owned sends its client back to
                // the queue (FIFO append, not priority reinsertion).
                for room in self.fabric.rooms_of(&id) {
                    let session_zone = self.sessions.by_room(&room).map(|s| s.zone.clone());
                    for member in self.fabric.members(&room) {
                        if member == id {
                            continue;
                        }
                        let Some(m) = self.registry.get(&member) else {
                            continue;
                        };
                        if m.identity.role != Role::Client {
                            continue;
                        }
                        let name = m.identity.display_name.clone();
                        let zone = m
                            .zone
                            .clone()
                            .or_else(|| session_zone.clone())
                            .unwrap_or_else(|| self.config.default_zone.clone());
                        info!(connection_id = %member, zone = %zone, "client requeued after operator loss");
                        self.queue.enqueue(WaitingEntry {
                            connection_id: member.clone(),
                            display_name: name,
                            zone: zone.clone(),
                        });
                        self.fabric.send(&member, ServerEvent::Requeued { zone });
                    }
                }
                self.fabric.unregister(&id);
            }
            Role::Client => {
                for room in self.fabric.rooms_of(&id) {
                    self.fabric.broadcast_except(
                        &room,
                        &id,
                        &ServerEvent::RoomClosed { room: room.clone() },
                    );
                }
                self.fabric.unregister(&id);
                // An open, unrated session stops appearing as active.
                if let Some(session_id) = meta.session_id {
                    match self
                        .storage
                        .close_session(session_id, self.config.abandon_rating)
                        .await
                    {
                        Ok(true) => {
                            info!(session_id, "session auto-closed on client disconnect");
                            self.sessions.close(session_id);
                        }
                        Ok(false) => {}
                        Err(e) => warn!(error = %e, session_id, "auto-close failed"),
                    }
                }
            }
        }

        self.broadcast_queue();
        self.broadcast_stats();
    }

    // --- Broadcast helpers ---------------------------------------------------

    fn broadcast_queue(&self) {
        self.fabric.broadcast_all(&ServerEvent::QueueSnapshot {
            entries: self.queue.snapshot(),
        });
    }

    fn broadcast_stats(&self) {
        let event = ServerEvent::StatsSnapshot {
            waiting: self.queue.len(),
            active_rooms: self.fabric.active_room_count(),
        };
        for (_, conn) in self.registry.online_operators() {
            self.fabric.send(conn, event.clone());
        }
    }

    /// Fetch and deliver a transcript after a short delay, off the actor
    /// task. Reads storage and sends through the captured handle only.
    fn spawn_history_recap(
        &self,
        handle: ConnectionHandle,
        fetch_session: i64,
        room: String,
        session_id: i64,
    ) {
        let storage = Arc::clone(&self.storage);
        let delay = self.config.history_replay_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match storage.list_messages(fetch_session).await {
                Ok(messages) if !messages.is_empty() => {
                    let messages = messages
                        .into_iter()
                        .map(|m| MessageView {
                            sender: m.sender_name,
                            content: m.content,
                            is_operator: m.is_operator,
                            read_at: m.read_at,
                            created_at: m.created_at,
                        })
                        .collect();
                    handle.send(ServerEvent::HistoryRecap {
                        room,
                        session_id,
                        messages,
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, session_id = fetch_session, "history redelivery failed")
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.history_replay_delay, Duration::from_millis(500));
        assert_eq!(config.abandon_rating, 1);
        assert_eq!(config.default_zone, "General");
    }
}
