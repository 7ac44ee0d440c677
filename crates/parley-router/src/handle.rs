// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cloneable handle for submitting work to the router actor.

use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use parley_core::{ClientEvent, ConnectionId, Identity};

use crate::commands::RouterCommand;
use crate::fabric::ConnectionHandle;

/// Sender side of the router actor's command channel.
///
/// All submissions are fire-and-forget except [`online_operators`], which is
/// a read-only snapshot request. A closed channel (actor gone) is logged and
/// swallowed; per-operation failures are surfaced to connections as server
/// events, never through this handle.
///
/// [`online_operators`]: RouterHandle::online_operators
#[derive(Clone)]
pub struct RouterHandle {
    tx: mpsc::Sender<RouterCommand>,
}

impl RouterHandle {
    pub(crate) fn new(tx: mpsc::Sender<RouterCommand>) -> Self {
        Self { tx }
    }

    pub async fn connect(
        &self,
        id: ConnectionId,
        identity: Identity,
        zone: Option<String>,
        handle: ConnectionHandle,
    ) {
        self.submit(RouterCommand::Connect {
            id,
            identity,
            zone,
            handle,
        })
        .await;
    }

    pub async fn disconnect(&self, id: ConnectionId) {
        self.submit(RouterCommand::Disconnect { id }).await;
    }

    pub async fn event(&self, id: ConnectionId, event: ClientEvent) {
        self.submit(RouterCommand::Event { id, event }).await;
    }

    /// Logins of all currently online operators. Empty if the actor is gone.
    pub async fn online_operators(&self) -> Vec<String> {
        let (reply, rx) = oneshot::channel();
        self.submit(RouterCommand::OnlineOperators { reply }).await;
        rx.await.unwrap_or_default()
    }

    async fn submit(&self, command: RouterCommand) {
        if self.tx.send(command).await.is_err() {
            warn!("router actor is gone; dropping command");
        }
    }
}
