// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captured outbound replies for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use courier_core::traits::channel::ChannelAdapter;
use courier_core::{CourierError, InboundEvent, MessageId, OutboundReply};

/// A mock messaging channel for testing.
///
/// Provides two queues:
/// - **inbound**: events injected via `inject_event()` are returned by `receive()`
/// - **sent**: replies passed to `send()` are captured and retrievable via `sent_replies()`
///
/// `set_fail_sends(true)` makes every subsequent `send()` fail, for driving
/// the dispatcher's reply-failure paths.
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    sent: Arc<Mutex<Vec<OutboundReply>>>,
    typing: Arc<Mutex<Vec<String>>>,
    fail_sends: Arc<Mutex<bool>>,
    notify: Arc<Notify>,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            typing: Arc::new(Mutex::new(Vec::new())),
            fail_sends: Arc::new(Mutex::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Inject an inbound event into the receive queue.
    pub async fn inject_event(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Get all replies that were sent through `send()`.
    pub async fn sent_replies(&self) -> Vec<OutboundReply> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent replies.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Get the handles that received a typing indicator.
    pub async fn typing_signals(&self) -> Vec<String> {
        self.typing.lock().await.clone()
    }

    /// Make every subsequent `send()` fail (or succeed again with `false`).
    pub async fn set_fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().await = fail;
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    async fn connect(&mut self) -> Result<(), CourierError> {
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, CourierError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            // Wait for notification that a new event was injected.
            self.notify.notified().await;
        }
    }

    async fn send(&self, reply: OutboundReply) -> Result<MessageId, CourierError> {
        if *self.fail_sends.lock().await {
            return Err(CourierError::Channel {
                message: "mock send failure".into(),
                source: None,
            });
        }
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(reply);
        Ok(MessageId(id))
    }

    async fn send_typing(&self, to: &str) -> Result<(), CourierError> {
        self.typing.lock().await.push(to.to_string());
        Ok(())
    }
}
