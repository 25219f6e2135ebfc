// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User CRUD operations.

use courier_core::CourierError;
use rusqlite::params;

use crate::database::Database;
use crate::models::User;

/// Find the user owning `handle`, creating the row on first contact.
///
/// Atomic with respect to the unique handle constraint: concurrent calls for
/// the same fresh handle race on `INSERT .. ON CONFLICT DO NOTHING` and both
/// read back the single surviving row. No application-level locking.
pub async fn find_or_create(db: &Database, handle: &str) -> Result<User, CourierError> {
    let handle = handle.to_string();
    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, handle, message_count, created_at, updated_at)
                 VALUES (?1, ?2, 0, ?3, ?3)
                 ON CONFLICT(handle) DO NOTHING",
                params![id, handle, now],
            )?;
            let user = conn.query_row(
                "SELECT id, handle, message_count, created_at, updated_at
                 FROM users WHERE handle = ?1",
                params![handle],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        handle: row.get(1)?,
                        message_count: row.get(2)?,
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                },
            )?;
            Ok(user)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a user by handle, if present.
pub async fn find_by_handle(db: &Database, handle: &str) -> Result<Option<User>, CourierError> {
    let handle = handle.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT id, handle, message_count, created_at, updated_at
                 FROM users WHERE handle = ?1",
                params![handle],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        handle: row.get(1)?,
                        message_count: row.get(2)?,
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                },
            );
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Increment a user's cumulative message count.
pub async fn increment_message_count(db: &Database, user_id: &str) -> Result<(), CourierError> {
    let user_id = user_id.to_string();
    let now = chrono::Utc::now().to_rfc3339();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE users SET message_count = message_count + 1, updated_at = ?1
                 WHERE id = ?2",
                params![now, user_id],
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
    async fn find_or_create_creates_on_first_contact() {
        let (db, _dir) = setup_db().await;

        let user = find_or_create(&db, "+15551234").await.unwrap();
        assert_eq!(user.handle, "+15551234");
        assert_eq!(user.message_count, 0);
        assert!(!user.id.is_empty());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn find_or_create_returns_existing_row() {
        let (db, _dir) = setup_db().await;

        let first = find_or_create(&db, "+15551234").await.unwrap();
        let second = find_or_create(&db, "+15551234").await.unwrap();
        assert_eq!(first.id, second.id, "same handle must map to one user");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn find_by_handle_returns_none_for_unknown() {
        let (db, _dir) = setup_db().await;
        assert!(find_by_handle(&db, "+10000000").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn increment_message_count_is_monotonic() {
        let (db, _dir) = setup_db().await;

        let user = find_or_create(&db, "+15551234").await.unwrap();
        increment_message_count(&db, &user.id).await.unwrap();
        increment_message_count(&db, &user.id).await.unwrap();

        let user = find_by_handle(&db, "+15551234").await.unwrap().unwrap();
        assert_eq!(user.message_count, 2);

        db.close().await.unwrap();
    }
}
