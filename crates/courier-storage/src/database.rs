// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. The `Database` struct IS the single writer: query modules accept
//! `&Database` and call through `connection().call()`. Do NOT create
//! additional `Connection` instances for writes.

use courier_core::CourierError;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::migrations;

/// Handle to the SQLite database.
///
/// Cheap to clone; all clones share the same background writer thread.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path`, applies PRAGMAs,
    /// and runs all pending migrations.
    pub async fn open(path: &str) -> Result<Self, CourierError> {
        let conn = Connection::open(path)
            .await
            .map_err(tokio_rusqlite::Error::from)
            .map_err(map_tr_err)?;

        conn.call(|conn| {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| {
            migrations::run_migrations(conn).map_err(|e| {
                rusqlite::Error::ToSqlConversionFailure(
                    format!("migration failed: {e}").into(),
                )
            })
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// Drops all Courier tables (and the migration history) and re-runs the
    /// migrations from scratch. Destroys all persisted data.
    pub async fn reset(&self) -> Result<(), CourierError> {
        info!("destructive resync requested: dropping and recreating tables");
        self.conn
            .call(|conn| {
                conn.execute_batch(
                    "DROP TABLE IF EXISTS messages;
                     DROP TABLE IF EXISTS users;
                     DROP TABLE IF EXISTS refinery_schema_history;",
                )?;
                migrations::run_migrations(conn).map_err(|e| {
                    rusqlite::Error::ToSqlConversionFailure(
                    format!("migration failed: {e}").into(),
                )
                })
            })
            .await
            .map_err(map_tr_err)
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoints the WAL and closes the connection.
    pub async fn close(self) -> Result<(), CourierError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(map_tr_err)?;
        debug!("database closed");
        Ok(())
    }
}

/// Maps a tokio-rusqlite error into the storage error variant.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> CourierError {
    CourierError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_database_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("open.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        assert!(path.exists(), "database file should be created");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_is_idempotent_across_restarts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reopen.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();

        // Second open must not fail on already-applied migrations.
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fk.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();

        let result = db
            .connection()
            .call(|conn| {
                conn.execute(
                    "INSERT INTO messages (id, user_id, handle, content, role, created_at)
                     VALUES ('m1', 'no-such-user', '+1', 'hi', 'user', '2026-01-01T00:00:00.000Z')",
                    [],
                )?;
                Ok::<(), rusqlite::Error>(())
            })
            .await;
        assert!(result.is_err(), "orphan message must violate the FK");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reset_wipes_data_and_recreates_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reset.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();

        db.connection()
            .call(|conn| {
                conn.execute(
                    "INSERT INTO users (id, handle, message_count, created_at, updated_at)
                     VALUES ('u1', '+1555', 0, '2026-01-01T00:00:00.000Z', '2026-01-01T00:00:00.000Z')",
                    [],
                )?;
                Ok::<(), rusqlite::Error>(())
            })
            .await
            .unwrap();

        db.reset().await.unwrap();

        let count: i64 = db
            .connection()
            .call(|conn| {
                let n = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
                Ok::<i64, rusqlite::Error>(n)
            })
            .await
            .unwrap();
        assert_eq!(count, 0, "reset should drop all rows");
        db.close().await.unwrap();
    }
}
