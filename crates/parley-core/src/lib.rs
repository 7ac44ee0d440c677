// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Parley support-chat router.
//!
//! This crate provides the foundational trait definitions, error types, wire
//! events, and domain types used throughout the Parley workspace.

pub mod error;
pub mod events;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ParleyError;
pub use events::{ClientEvent, MessageView, QueueEntryView, ServerEvent};
pub use traits::{IdentityVerifier, StorageAdapter};
pub use types::{
    ConnectionId, Identity, Operator, Role, Session, StoredMessage, WaitingEntry, SYSTEM_SENDER,
};
