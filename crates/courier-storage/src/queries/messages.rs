// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message log operations. Messages are append-only and never mutated.

use std::str::FromStr;

use courier_core::CourierError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{ChatRole, Message};

/// Append a message to the log.
pub async fn insert_message(db: &Database, msg: &Message) -> Result<(), CourierError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, user_id, handle, content, role, session_id, metadata, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    msg.id,
                    msg.user_id,
                    msg.handle,
                    msg.content,
                    msg.role.to_string(),
                    msg.session_id,
                    msg.metadata,
                    msg.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get the most recent `limit` messages for a handle, newest first.
///
/// Callers reverse the result for chronological use. `rowid` breaks ties
/// between messages written within the same timestamp granularity.
pub async fn recent_for_handle(
    db: &Database,
    handle: &str,
    limit: u32,
) -> Result<Vec<Message>, CourierError> {
    let handle = handle.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, handle, content, role, session_id, metadata, created_at
                 FROM messages WHERE handle = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![handle, limit], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count all messages persisted for a handle.
pub async fn count_for_handle(db: &Database, handle: &str) -> Result<i64, CourierError> {
    let handle = handle.to_string();
    db.connection()
        .call(move |conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE handle = ?1",
                params![handle],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn row_to_message(row: &rusqlite::Row<'_>) -> Result<Message, rusqlite::Error> {
    let role_text: String = row.get(4)?;
    let role = ChatRole::from_str(&role_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Message {
        id: row.get(0)?,
        user_id: row.get(1)?,
        handle: row.get(2)?,
        content: row.get(3)?,
        role,
        session_id: row.get(5)?,
        metadata: row.get(6)?,
        created_at: row.get(7)?,
    })
}
