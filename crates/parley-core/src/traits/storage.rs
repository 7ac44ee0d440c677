// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the durable session/message store.
//!
//! The routing core consumes this narrow interface; it never sees SQL. All
//! calls are suspension points for the router actor, so a caller that read
//! registry or queue state before a call here must re-validate it after.

use async_trait::async_trait;

use crate::error::ParleyError;
use crate::types::{Operator, Session, StoredMessage};

/// Adapter for the durable session/message store.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Initializes the backend (migrations, connection, PRAGMAs).
    async fn initialize(&self) -> Result<(), ParleyError>;

    /// Flushes pending writes and releases the backend.
    async fn close(&self) -> Result<(), ParleyError>;

    /// Create an ACTIVE session. Returns the store-assigned id (monotonic,
    /// unique).
    async fn create_session(
        &self,
        client_name: &str,
        operator_login: &str,
        zone: &str,
        room_id: &str,
    ) -> Result<i64, ParleyError>;

    /// Point the session at a new operator.
    async fn update_session_operator(
        &self,
        session_id: i64,
        operator_login: &str,
    ) -> Result<(), ParleyError>;

    /// Accepted-transfer commit: operator change plus the transfer system
    /// message as one durable step, so a crash between them can never leave
    /// the store behind the UI. Returns `false` if the session does not
    /// exist (nothing written).
    async fn record_transfer(
        &self,
        session_id: i64,
        operator_login: &str,
        system_message: &str,
    ) -> Result<bool, ParleyError>;

    /// Close the session with the given rating only if it is still unrated.
    /// Returns whether a row transitioned to closed.
    async fn close_session(&self, session_id: i64, rating: i64) -> Result<bool, ParleyError>;

    /// Overwrite the rating with the client's explicit score.
    async fn record_rating(&self, session_id: i64, rating: i64) -> Result<(), ParleyError>;

    /// Append one message to the session transcript.
    async fn append_message(
        &self,
        session_id: i64,
        sender_name: &str,
        content: &str,
        is_operator: bool,
    ) -> Result<(), ParleyError>;

    /// Set `read_at` on every still-unread message authored by the role the
    /// reader is NOT. Returns the number of newly marked rows; calling twice
    /// in a row returns 0 the second time.
    async fn mark_read(
        &self,
        session_id: i64,
        reader_is_operator: bool,
    ) -> Result<u64, ParleyError>;

    /// Flag the session for moderator review.
    async fn mark_reported(&self, session_id: i64, reason: &str) -> Result<(), ParleyError>;

    /// Most recent open (unrated) session for a client display name, if any.
    async fn find_open_session_by_client_name(
        &self,
        client_name: &str,
    ) -> Result<Option<Session>, ParleyError>;

    /// Fetch a session by id.
    async fn get_session(&self, session_id: i64) -> Result<Option<Session>, ParleyError>;

    /// Full transcript in chronological order.
    async fn list_messages(&self, session_id: i64) -> Result<Vec<StoredMessage>, ParleyError>;

    /// Operator account lookup for credential verification.
    async fn find_operator(&self, username: &str) -> Result<Option<Operator>, ParleyError>;

    /// Insert an operator account if the username is free.
    async fn create_operator(&self, operator: &Operator) -> Result<(), ParleyError>;

    /// All operator accounts (for the online-roster endpoint).
    async fn list_operators(&self) -> Result<Vec<Operator>, ParleyError>;
}
