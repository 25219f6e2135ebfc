// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation context assembly for gateway requests.
//!
//! The rolling window is small: the most recent few messages for a handle,
//! reduced to role and content, oldest first. A store failure here degrades
//! to an empty window instead of failing the turn.

use courier_core::{ChatRole, Turn};
use courier_storage::Database;
use courier_storage::queries::messages;
use tracing::warn;

/// Loads the most recent `limit` messages for `handle` as chronological turns.
///
/// Transport metadata and ids are stripped; only role and content survive.
/// Returns an empty sequence on a store read failure so the conversation
/// continues without history.
pub async fn build_context(db: &Database, handle: &str, limit: u32) -> Vec<Turn> {
    match messages::recent_for_handle(db, handle, limit).await {
        Ok(recent) => recent
            .into_iter()
            .rev()
            .map(|msg| Turn {
                role: msg.role,
                content: msg.content,
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, handle, "failed to load conversation context, continuing without history");
            Vec::new()
        }
    }
}

/// Builds the full turn sequence for a gateway request: the fixed system
/// instruction, then history, then the current inbound turn.
pub fn assemble_turns(system_prompt: &str, history: Vec<Turn>, body: &str) -> Vec<Turn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(Turn::new(ChatRole::System, system_prompt));
    turns.extend(history);
    turns.push(Turn::new(ChatRole::User, body));
    turns
}
