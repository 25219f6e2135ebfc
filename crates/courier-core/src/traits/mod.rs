// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams for Courier's external collaborators.
//!
//! The messaging transport and the completion service are injected
//! capabilities behind `#[async_trait]` traits so the dispatcher can be
//! exercised against mocks.

pub mod channel;
pub mod gateway;

pub use channel::ChannelAdapter;
pub use gateway::CompletionGateway;
