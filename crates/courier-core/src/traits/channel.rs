// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the messaging transport.

use async_trait::async_trait;

use crate::error::CourierError;
use crate::types::{InboundEvent, MessageId, OutboundReply};

/// Injected capability over the messaging transport.
///
/// The transport itself (session lifecycle, authentication, reconnects) is
/// owned by an external collaborator; this seam only delivers inbound events
/// and accepts replies.
#[async_trait]
pub trait ChannelAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this channel.
    fn name(&self) -> &str;

    /// Establishes the connection to the transport.
    async fn connect(&mut self) -> Result<(), CourierError>;

    /// Receives the next inbound event from the transport.
    async fn receive(&self) -> Result<InboundEvent, CourierError>;

    /// Sends a reply through the transport.
    async fn send(&self, reply: OutboundReply) -> Result<MessageId, CourierError>;

    /// Signals a typing indicator to the given handle. Best effort.
    async fn send_typing(&self, to: &str) -> Result<(), CourierError>;
}
