// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The waiting queue: ordered, zone-tagged clients awaiting assignment.
//!
//! One ordered list for all zones; zone is carried as metadata and any
//! operator may pick any zone's client. FIFO, no priorities.

use parley_core::{ConnectionId, QueueEntryView, WaitingEntry};

/// Ordered list of clients not yet assigned an operator.
#[derive(Default)]
pub struct WaitingQueue {
    entries: Vec<WaitingEntry>,
}

impl WaitingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, first removing any prior entry for the same
    /// connection id. Idempotent under reconnect storms: repeated calls
    /// leave exactly one entry, carrying the most recent zone.
    pub fn enqueue(&mut self, entry: WaitingEntry) {
        self.entries
            .retain(|e| e.connection_id != entry.connection_id);
        self.entries.push(entry);
    }

    /// Remove and return the entry for a connection. No-op if absent.
    pub fn remove(&mut self, id: &ConnectionId) -> Option<WaitingEntry> {
        let pos = self.entries.iter().position(|e| &e.connection_id == id)?;
        Some(self.entries.remove(pos))
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.entries.iter().any(|e| &e.connection_id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full ordered list for broadcast to operators and waiting clients.
    pub fn snapshot(&self) -> Vec<QueueEntryView> {
        self.entries
            .iter()
            .map(|e| QueueEntryView {
                connection_id: e.connection_id.0.clone(),
                name: e.display_name.clone(),
                zone: e.zone.clone(),
            })
            .collect()
    }
}
