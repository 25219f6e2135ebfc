// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the trait seams and the Courier workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a message, as assigned by the channel on send.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Role tag on a conversation turn.
///
/// Stored messages only ever carry `user` or `assistant`; `system` appears in
/// gateway payloads for the fixed instruction turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role-tagged message unit in a conversation exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: ChatRole,
    pub content: String,
}

impl Turn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

// --- Channel types ---

/// An inbound message event delivered by the messaging channel.
///
/// `metadata` is an opaque JSON bag of transport-specific identifiers. The
/// core never interprets it; it is stored verbatim alongside the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Transport-assigned event id.
    pub id: String,
    /// Sender handle (e.g. a phone-number style contact identifier).
    pub sender: String,
    /// Message body text. Empty for media-only messages.
    pub body: String,
    /// True when the event originated from the bot's own account.
    pub from_self: bool,
    /// True when the message carries an attachment.
    pub has_media: bool,
    /// Opaque transport identifier bag, JSON-encoded.
    pub metadata: Option<String>,
}

/// An outbound reply to be sent through the messaging channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    /// Destination handle, normally the sender of the event being answered.
    pub to: String,
    /// Reply body text.
    pub content: String,
}

// --- Persistence types ---

/// A user aggregate: one row per external contact handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub handle: String,
    pub message_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// A persisted conversation message. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub handle: String,
    pub content: String,
    pub role: ChatRole,
    pub session_id: Option<String>,
    pub metadata: Option<String>,
    pub created_at: String,
}

// --- Gateway types ---

/// A request to the completion gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    /// Ordered turns: system instruction, history, then the current user turn.
    pub turns: Vec<Turn>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

/// A completion returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
}
