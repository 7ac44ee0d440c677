// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness: a router actor over temp SQLite plus scripted connections.
//!
//! Each harness is fully isolated (own temp directory, own actor task), so
//! tests are independent and order-insensitive.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use parley_config::StorageConfig;
use parley_core::{ClientEvent, ConnectionId, Identity, ServerEvent, StorageAdapter};
use parley_router::{ConnectionHandle, RouterActor, RouterConfig, RouterHandle};
use parley_storage::SqliteStorage;

/// How long [`TestConnection::recv`] waits before declaring a test hung.
const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// An isolated routing engine for one test.
pub struct TestHarness {
    pub router: RouterHandle,
    pub storage: Arc<SqliteStorage>,
    _dir: tempfile::TempDir,
}

impl TestHarness {
    /// Build a harness with a fast history-replay delay so recap tests do
    /// not sleep for the production half second.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("parley-test.db");
        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: db_path.to_str().expect("utf-8 path").to_string(),
        }));
        storage.initialize().await.expect("storage init");

        let config = RouterConfig {
            history_replay_delay: Duration::from_millis(10),
            ..RouterConfig::default()
        };
        let dyn_storage: Arc<dyn StorageAdapter> = storage.clone();
        let (router, _task) = RouterActor::spawn(dyn_storage, config);

        Self {
            router,
            storage,
            _dir: dir,
        }
    }

    /// Connect an operator identity.
    pub async fn connect_operator(&self, login: &str, name: &str) -> TestConnection {
        self.connect(Identity::operator(login, name), None).await
    }

    /// Connect a client identity that immediately queues in `zone`.
    pub async fn connect_client(&self, name: &str, zone: &str) -> TestConnection {
        self.connect(Identity::client(name), Some(zone.to_string()))
            .await
    }

    /// Connect a client identity without queueing (reconnect-resolution
    /// tests drive the queue join themselves).
    pub async fn connect_client_unqueued(&self, name: &str) -> TestConnection {
        self.connect(Identity::client(name), None).await
    }

    async fn connect(&self, identity: Identity, zone: Option<String>) -> TestConnection {
        let id = ConnectionId(uuid::Uuid::new_v4().to_string());
        let (handle, rx) = ConnectionHandle::channel(id.clone());
        self.router
            .connect(id.clone(), identity, zone, handle)
            .await;
        TestConnection {
            id,
            rx,
            router: self.router.clone(),
        }
    }
}

/// One scripted connection: send client events, observe server events.
pub struct TestConnection {
    pub id: ConnectionId,
    rx: mpsc::Receiver<ServerEvent>,
    router: RouterHandle,
}

impl TestConnection {
    pub async fn send(&self, event: ClientEvent) {
        self.router.event(self.id.clone(), event).await;
    }

    /// Next event, failing the test after a timeout.
    pub async fn recv(&mut self) -> ServerEvent {
        timeout(RECV_TIMEOUT, self.rx.recv())
            .await
            .expect("timed out waiting for server event")
            .expect("connection event stream closed")
    }

    /// Skip events until one matches the predicate.
    pub async fn expect<F>(&mut self, pred: F) -> ServerEvent
    where
        F: Fn(&ServerEvent) -> bool,
    {
        loop {
            let event = self.recv().await;
            if pred(&event) {
                return event;
            }
        }
    }

    /// Assert nothing arrives within `window`.
    pub async fn assert_silent(&mut self, window: Duration) {
        if let Ok(Some(event)) = timeout(window, self.rx.recv()).await {
            panic!("expected silence, got {event:?}");
        }
    }

    /// Drain anything already buffered.
    pub fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }

    /// Tear the transport down and tell the router.
    pub async fn disconnect(self) {
        let TestConnection { id, rx, router } = self;
        drop(rx);
        router.disconnect(id).await;
    }
}
