// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound event filtering.
//!
//! Ineligible events are discarded silently before any store write or reply:
//! the bot's own messages, broadcast traffic, group traffic, and empty or
//! media-only bodies.

use courier_core::InboundEvent;

/// Sender handle used by status broadcasts.
const BROADCAST_SENDER: &str = "status@broadcast";

/// Suffix that marks a group chat handle.
const GROUP_SUFFIX: &str = "@g.us";

/// Why an inbound event was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    /// Sent by the bot's own account.
    OwnMessage,
    /// Status-broadcast traffic.
    Broadcast,
    /// Group chat traffic.
    Group,
    /// Empty body or media-only message.
    EmptyOrMedia,
}

impl std::fmt::Display for FilterReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterReason::OwnMessage => write!(f, "own message"),
            FilterReason::Broadcast => write!(f, "broadcast"),
            FilterReason::Group => write!(f, "group"),
            FilterReason::EmptyOrMedia => write!(f, "empty or media-only"),
        }
    }
}

/// Classifies an event, returning the discard reason for ineligible ones.
pub fn classify(event: &InboundEvent) -> Option<FilterReason> {
    if event.from_self {
        return Some(FilterReason::OwnMessage);
    }
    if event.sender == BROADCAST_SENDER {
        return Some(FilterReason::Broadcast);
    }
    if event.sender.ends_with(GROUP_SUFFIX) {
        return Some(FilterReason::Group);
    }
    if event.body.is_empty() || event.has_media {
        return Some(FilterReason::EmptyOrMedia);
    }
    None
}
