// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Courier integration tests.
//!
//! Provides mock adapters and a test harness for fast, deterministic,
//! CI-runnable tests without a bridge process or a live completion API.
//!
//! # Components
//!
//! - [`MockChannel`] - mock messaging channel with event injection and reply capture
//! - [`MockGateway`] - mock completion gateway with scripted responses and failures
//! - [`TestHarness`] - temp SQLite + mocks + dispatcher, driven through `deliver()`

pub mod harness;
pub mod mock_channel;
pub mod mock_gateway;

pub use harness::TestHarness;
pub use mock_channel::MockChannel;
pub use mock_gateway::MockGateway;
