// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Courier relay bot.
//!
//! This crate provides the trait seams, error type, and common types shared
//! across the Courier workspace. The messaging channel and the completion
//! gateway are external collaborators reached through the traits defined
//! here; everything else depends only on these definitions.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CourierError;
pub use types::{
    ChatRole, CompletionRequest, CompletionResponse, InboundEvent, Message, MessageId,
    OutboundReply, Turn, User,
};

pub use traits::{ChannelAdapter, CompletionGateway};
