// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session CRUD operations.

use parley_core::ParleyError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Session;

const SESSION_COLUMNS: &str = "id, client_name, operator_login, zone, room_id, reported,
     report_reason, rating, internal_notes, created_at";

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        client_name: row.get(1)?,
        operator_login: row.get(2)?,
        zone: row.get(3)?,
        room_id: row.get(4)?,
        reported: row.get::<_, i64>(5)? != 0,
        report_reason: row.get(6)?,
        rating: row.get(7)?,
        internal_notes: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Create an ACTIVE session and return the store-assigned id.
pub async fn create_session(
    db: &Database,
    client_name: &str,
    operator_login: &str,
    zone: &str,
    room_id: &str,
) -> Result<i64, ParleyError> {
    let client_name = client_name.to_string();
    let operator_login = operator_login.to_string();
    let zone = zone.to_string();
    let room_id = room_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (client_name, operator_login, zone, room_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![client_name, operator_login, zone, room_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a session by id.
pub async fn get_session(db: &Database, id: i64) -> Result<Option<Session>, ParleyError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_session);
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Most recent open (unrated) session for a client display name.
pub async fn find_open_by_client_name(
    db: &Database,
    client_name: &str,
) -> Result<Option<Session>, ParleyError> {
    let client_name = client_name.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions
                 WHERE client_name = ?1 AND rating IS NULL
                 ORDER BY created_at DESC, id DESC LIMIT 1"
            ))?;
            let result = stmt.query_row(params![client_name], row_to_session);
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Point the session at a new operator.
pub async fn update_session_operator(
    db: &Database,
    id: i64,
    operator_login: &str,
) -> Result<(), ParleyError> {
    let operator_login = operator_login.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE sessions SET operator_login = ?1 WHERE id = ?2",
                params![operator_login, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Accepted-transfer commit: the operator update and the transfer system
/// message land in one transaction, so the session record is never behind
/// the notifications built on top of it. Returns `false` (and writes
/// nothing) if the session does not exist.
pub async fn record_transfer(
    db: &Database,
    id: i64,
    operator_login: &str,
    system_message: &str,
) -> Result<bool, ParleyError> {
    let operator_login = operator_login.to_string();
    let system_message = system_message.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE sessions SET operator_login = ?1 WHERE id = ?2",
                params![operator_login, id],
            )?;
            if changed == 0 {
                tx.commit()?;
                return Ok(false);
            }
            tx.execute(
                "INSERT INTO messages (session_id, sender_name, content, is_operator)
                 VALUES (?1, ?2, ?3, 1)",
                params![id, parley_core::SYSTEM_SENDER, system_message],
            )?;
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Close the session with `rating` only if it is still unrated. Returns
/// whether a row transitioned to closed.
pub async fn close_session(db: &Database, id: i64, rating: i64) -> Result<bool, ParleyError> {
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE sessions SET rating = COALESCE(rating, ?1)
                 WHERE id = ?2 AND rating IS NULL",
                params![rating, id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Overwrite the rating with the client's explicit score.
pub async fn record_rating(db: &Database, id: i64, rating: i64) -> Result<(), ParleyError> {
    let changed = db
        .connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE sessions SET rating = ?1 WHERE id = ?2",
                params![rating, id],
            )?;
            Ok(changed)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    if changed == 0 {
        return Err(ParleyError::NotFound(format!("session {id}")));
    }
    Ok(())
}

/// Flag the session for moderator review.
pub async fn mark_reported(db: &Database, id: i64, reason: &str) -> Result<(), ParleyError> {
    let reason = reason.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE sessions SET reported = 1, report_reason = ?1 WHERE id = ?2",
                params![reason, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn create_and_get_session() {
        let (db, _dir) = setup_db().await;
        let id = create_session(&db, "Alice", "bob", "SAV", "room_c1")
            .await
            .unwrap();
        assert!(id > 0);

        let session = get_session(&db, id).await.unwrap().unwrap();
        assert_eq!(session.client_name, "Alice");
        assert_eq!(session.operator_login, "bob");
        assert_eq!(session.zone, "SAV");
        assert_eq!(session.room_id, "room_c1");
        assert!(session.rating.is_none());
        assert!(!session.reported);
    }

    #[tokio::test]
    async fn get_nonexistent_session_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_session(&db, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn session_ids_are_monotonic() {
        let (db, _dir) = setup_db().await;
        let a = create_session(&db, "Alice", "bob", "SAV", "room_a").await.unwrap();
        let b = create_session(&db, "Carol", "bob", "SAV", "room_b").await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn find_open_prefers_most_recent_and_skips_rated() {
        let (db, _dir) = setup_db().await;
        let first = create_session(&db, "Alice", "bob", "SAV", "room_1").await.unwrap();
        let second = create_session(&db, "Alice", "eve", "SAV", "room_2").await.unwrap();

        // Two stale open sessions for the same name: most recent wins.
        let found = find_open_by_client_name(&db, "Alice").await.unwrap().unwrap();
        assert_eq!(found.id, second);

        // Rating the most recent one makes the older one the open session again.
        record_rating(&db, second, 5).await.unwrap();
        let found = find_open_by_client_name(&db, "Alice").await.unwrap().unwrap();
        assert_eq!(found.id, first);

        record_rating(&db, first, 4).await.unwrap();
        assert!(find_open_by_client_name(&db, "Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_session_operator_changes_owner() {
        let (db, _dir) = setup_db().await;
        let id = create_session(&db, "Alice", "bob", "SAV", "room_1").await.unwrap();
        update_session_operator(&db, id, "eve").await.unwrap();
        let session = get_session(&db, id).await.unwrap().unwrap();
        assert_eq!(session.operator_login, "eve");
    }

    #[tokio::test]
    async fn record_transfer_writes_operator_and_message_together() {
        let (db, _dir) = setup_db().await;
        let id = create_session(&db, "Alice", "bob", "SAV", "room_1").await.unwrap();

        let ok = record_transfer(&db, id, "eve", "Conversation taken over by Eve.")
            .await
            .unwrap();
        assert!(ok);

        let session = get_session(&db, id).await.unwrap().unwrap();
        assert_eq!(session.operator_login, "eve");

        let messages = crate::queries::messages::list_messages(&db, id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender_name, parley_core::SYSTEM_SENDER);
        assert!(messages[0].is_operator);
    }

    #[tokio::test]
    async fn record_transfer_missing_session_writes_nothing() {
        let (db, _dir) = setup_db().await;
        let ok = record_transfer(&db, 42, "eve", "nope").await.unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn close_session_only_touches_unrated_rows() {
        let (db, _dir) = setup_db().await;
        let id = create_session(&db, "Alice", "bob", "SAV", "room_1").await.unwrap();

        assert!(close_session(&db, id, 1).await.unwrap());
        let session = get_session(&db, id).await.unwrap().unwrap();
        assert_eq!(session.rating, Some(1));

        // Already terminal: a second close is a no-op.
        assert!(!close_session(&db, id, 3).await.unwrap());
        let session = get_session(&db, id).await.unwrap().unwrap();
        assert_eq!(session.rating, Some(1));
    }

    #[tokio::test]
    async fn rating_unknown_session_is_not_found() {
        let (db, _dir) = setup_db().await;
        let err = record_rating(&db, 404, 5).await.unwrap_err();
        assert!(matches!(err, parley_core::ParleyError::NotFound(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn mark_reported_sets_flag_and_reason() {
        let (db, _dir) = setup_db().await;
        let id = create_session(&db, "Alice", "bob", "SAV", "room_1").await.unwrap();
        mark_reported(&db, id, "[Zone: SAV] abusive language").await.unwrap();
        let session = get_session(&db, id).await.unwrap().unwrap();
        assert!(session.reported);
        assert_eq!(
            session.report_reason.as_deref(),
            Some("[Zone: SAV] abusive language")
        );
    }
}
