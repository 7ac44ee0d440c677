// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use parley_config::StorageConfig;
use parley_core::types::{Operator, Session, StoredMessage};
use parley_core::{ParleyError, StorageAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, ParleyError> {
        self.db.get().ok_or_else(|| ParleyError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), ParleyError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| ParleyError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ParleyError> {
        self.db()?.close().await
    }

    // --- Session operations ---

    async fn create_session(
        &self,
        client_name: &str,
        operator_login: &str,
        zone: &str,
        room_id: &str,
    ) -> Result<i64, ParleyError> {
        queries::sessions::create_session(self.db()?, client_name, operator_login, zone, room_id)
            .await
    }

    async fn update_session_operator(
        &self,
        session_id: i64,
        operator_login: &str,
    ) -> Result<(), ParleyError> {
        queries::sessions::update_session_operator(self.db()?, session_id, operator_login).await
    }

    async fn record_transfer(
        &self,
        session_id: i64,
        operator_login: &str,
        system_message: &str,
    ) -> Result<bool, ParleyError> {
        queries::sessions::record_transfer(self.db()?, session_id, operator_login, system_message)
            .await
    }

    async fn close_session(&self, session_id: i64, rating: i64) -> Result<bool, ParleyError> {
        queries::sessions::close_session(self.db()?, session_id, rating).await
    }

    async fn record_rating(&self, session_id: i64, rating: i64) -> Result<(), ParleyError> {
        queries::sessions::record_rating(self.db()?, session_id, rating).await
    }

    async fn mark_reported(&self, session_id: i64, reason: &str) -> Result<(), ParleyError> {
        queries::sessions::mark_reported(self.db()?, session_id, reason).await
    }

    async fn find_open_session_by_client_name(
        &self,
        client_name: &str,
    ) -> Result<Option<Session>, ParleyError> {
        queries::sessions::find_open_by_client_name(self.db()?, client_name).await
    }

    async fn get_session(&self, session_id: i64) -> Result<Option<Session>, ParleyError> {
        queries::sessions::get_session(self.db()?, session_id).await
    }

    // --- Message operations ---

    async fn append_message(
        &self,
        session_id: i64,
        sender_name: &str,
        content: &str,
        is_operator: bool,
    ) -> Result<(), ParleyError> {
        queries::messages::append_message(self.db()?, session_id, sender_name, content, is_operator)
            .await
    }

    async fn mark_read(
        &self,
        session_id: i64,
        reader_is_operator: bool,
    ) -> Result<u64, ParleyError> {
        queries::messages::mark_read(self.db()?, session_id, reader_is_operator).await
    }

    async fn list_messages(&self, session_id: i64) -> Result<Vec<StoredMessage>, ParleyError> {
        queries::messages::list_messages(self.db()?, session_id).await
    }

    // --- Operator operations ---

    async fn find_operator(&self, username: &str) -> Result<Option<Operator>, ParleyError> {
        queries::operators::find_operator(self.db()?, username).await
    }

    async fn create_operator(&self, operator: &Operator) -> Result<(), ParleyError> {
        queries::operators::create_operator(self.db()?, operator).await
    }

    async fn list_operators(&self) -> Result<Vec<Operator>, ParleyError> {
        queries::operators::list_operators(self.db()?).await
    }
}
