// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Commands delivered to the router actor.
//!
//! All inbound events funnel into this one enum so queue, registry, and
//! session mutations happen on a single logical event-dispatch stream.

use tokio::sync::oneshot;

use parley_core::{ClientEvent, ConnectionId, Identity};

use crate::fabric::ConnectionHandle;

/// One unit of work for the router actor.
pub enum RouterCommand {
    /// A verified connection came online. For clients this triggers
    /// reconnection resolution; `zone` carries the zone requested at
    /// connect time, if any.
    Connect {
        id: ConnectionId,
        identity: Identity,
        zone: Option<String>,
        handle: ConnectionHandle,
    },

    /// The transport for a connection went away.
    Disconnect { id: ConnectionId },

    /// A wire event from a connected client or operator. Fire-and-forget:
    /// failures surface as server events on the same connection.
    Event { id: ConnectionId, event: ClientEvent },

    /// Snapshot of online operator logins (for the transfer target roster).
    OnlineOperators {
        reply: oneshot::Sender<Vec<String>>,
    },
}
