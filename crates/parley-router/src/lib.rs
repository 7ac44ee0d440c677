// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session routing and state-synchronization engine for Parley.
//!
//! Clients wait in a zone-tagged queue, operators pick them, sessions can be
//! transferred between operators, and both sides survive transient
//! disconnects. All routing state (connection registry, waiting queue,
//! session registry, room fabric) is owned by one [`RouterActor`] task;
//! everything else talks to it through a [`RouterHandle`].

pub mod actor;
pub mod commands;
pub mod fabric;
pub mod handle;
pub mod queue;
pub mod registry;
pub mod sessions;

pub use actor::{RouterActor, RouterConfig};
pub use commands::RouterCommand;
pub use fabric::{ConnectionHandle, Fabric};
pub use handle::RouterHandle;
pub use queue::WaitingQueue;
pub use registry::{ConnectionMeta, ConnectionRegistry};
pub use sessions::{SessionRecord, SessionRegistry, SessionState};
