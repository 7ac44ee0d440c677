// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message append, transcript retrieval, and read-receipt operations.

use parley_core::ParleyError;
use rusqlite::params;

use crate::database::Database;
use crate::models::StoredMessage;

/// Append one message to the session transcript.
pub async fn append_message(
    db: &Database,
    session_id: i64,
    sender_name: &str,
    content: &str,
    is_operator: bool,
) -> Result<(), ParleyError> {
    let sender_name = sender_name.to_string();
    let content = content.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (session_id, sender_name, content, is_operator)
                 VALUES (?1, ?2, ?3, ?4)",
                params![session_id, sender_name, content, is_operator as i64],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Full transcript for a session in chronological order.
pub async fn list_messages(
    db: &Database,
    session_id: i64,
) -> Result<Vec<StoredMessage>, ParleyError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, session_id, sender_name, content, is_operator, read_at, created_at
                 FROM messages WHERE session_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )?;
            let rows = stmt.query_map(params![session_id], |row| {
                Ok(StoredMessage {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    sender_name: row.get(2)?,
                    content: row.get(3)?,
                    is_operator: row.get::<_, i64>(4)? != 0,
                    read_at: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set `read_at` on every still-unread message authored by the role the
/// reader is NOT. The timestamp is written once per row; re-invocation
/// marks nothing and returns 0.
pub async fn mark_read(
    db: &Database,
    session_id: i64,
    reader_is_operator: bool,
) -> Result<u64, ParleyError> {
    // An operator reads client-authored rows and vice versa.
    let authored_by_operator = !reader_is_operator;
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE messages
                 SET read_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE session_id = ?1 AND is_operator = ?2 AND read_at IS NULL",
                params![session_id, authored_by_operator as i64],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
