// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator account lookups for credential verification and seeding.
//!
//! Account management (create/delete/rename from an admin surface) lives
//! outside the core; only the reads the gateway needs, plus the startup
//! seed insert, are implemented here.

use parley_core::ParleyError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Operator;

/// Look up one operator account by username.
pub async fn find_operator(
    db: &Database,
    username: &str,
) -> Result<Option<Operator>, ParleyError> {
    let username = username.to_lowercase();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT username, display_name, password_hash
                 FROM operators WHERE username = ?1",
            )?;
            let result = stmt.query_row(params![username], |row| {
                Ok(Operator {
                    username: row.get(0)?,
                    display_name: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            });
            match result {
                Ok(op) => Ok(Some(op)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert an operator account. A taken username is a [`ParleyError::Conflict`].
pub async fn create_operator(db: &Database, operator: &Operator) -> Result<(), ParleyError> {
    let operator = operator.clone();
    let username = operator.username.to_lowercase();
    let username_for_err = username.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO operators (username, display_name, password_hash)
                 VALUES (?1, ?2, ?3)",
                params![username, operator.display_name, operator.password_hash],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                ParleyError::Conflict(format!("operator {username_for_err} already exists"))
            }
            other => crate::database::map_tr_err(other),
        })
}

/// All operator accounts, ordered by username.
pub async fn list_operators(db: &Database) -> Result<Vec<Operator>, ParleyError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT username, display_name, password_hash
                 FROM operators ORDER BY username ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(Operator {
                    username: row.get(0)?,
                    display_name: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            })?;
            let mut operators = Vec::new();
            for row in rows {
                operators.push(row?);
            }
            Ok(operators)
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

    fn make_operator(username: &str) -> Operator {
        Operator {
            username: username.to_string(),
            display_name: Some(format!("{username} display")),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_find_operator() {
        let (db, _dir) = setup_db().await;
        create_operator(&db, &make_operator("bob")).await.unwrap();

        let found = find_operator(&db, "bob").await.unwrap().unwrap();
        assert_eq!(found.username, "bob");
        assert_eq!(found.display_name.as_deref(), Some("bob display"));
    }

    #[tokio::test]
    async fn usernames_are_case_insensitive() {
        let (db, _dir) = setup_db().await;
        create_operator(&db, &make_operator("Bob")).await.unwrap();
        assert!(find_operator(&db, "BOB").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let (db, _dir) = setup_db().await;
        create_operator(&db, &make_operator("bob")).await.unwrap();
        let err = create_operator(&db, &make_operator("bob")).await.unwrap_err();
        assert!(matches!(err, ParleyError::Conflict(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn list_operators_ordered() {
        let (db, _dir) = setup_db().await;
        create_operator(&db, &make_operator("eve")).await.unwrap();
        create_operator(&db, &make_operator("bob")).await.unwrap();
        let all = list_operators(&db).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].username, "bob");
        assert_eq!(all[1].username, "eve");
    }
}
