// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Parley support-chat router.

use thiserror::Error;

/// The primary error type used across the Parley workspace.
///
/// Every failure is per-operation: nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure).
    ///
    /// An in-memory mutation that depended on the failed store call must not
    /// be considered committed by the caller.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport errors (connection failure, serialization, bind failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Credential verification failed. The connection is refused before any
    /// state mutation.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A waiting entry, session, or target operator vanished before the
    /// operation completed. The operation is aborted, never partially applied.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation would overwrite state that already has an owner
    /// (e.g. a second assignment of the same session).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
