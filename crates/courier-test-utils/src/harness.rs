// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete relay stack with mock adapters and a
//! temp SQLite database, and exposes `deliver()` to drive the dispatcher the
//! way the live receive loop would.

use std::sync::Arc;

use courier_bot::quota::QuotaTracker;
use courier_bot::{DispatchOutcome, Dispatcher};
use courier_config::CourierConfig;
use courier_core::{CourierError, InboundEvent};
use courier_storage::Database;

use crate::mock_channel::MockChannel;
use crate::mock_gateway::MockGateway;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    daily_limit: u32,
    history_limit: u32,
    system_prompt: String,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            daily_limit: 45,
            history_limit: 5,
            system_prompt: "You are a test assistant.".to_string(),
        }
    }

    /// Set scripted gateway responses.
    pub fn with_gateway_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Set the daily quota ceiling.
    pub fn with_daily_limit(mut self, limit: u32) -> Self {
        self.daily_limit = limit;
        self
    }

    /// Set the context window size.
    pub fn with_history_limit(mut self, limit: u32) -> Self {
        self.history_limit = limit;
        self
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, CourierError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| CourierError::Storage {
            source: e.into(),
        })?;
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let db = Database::open(&db_path_str).await?;

        let channel = Arc::new(MockChannel::new());
        let gateway = Arc::new(if self.responses.is_empty() {
            MockGateway::new()
        } else {
            MockGateway::with_responses(self.responses)
        });
        let quota = Arc::new(QuotaTracker::new(self.daily_limit));

        let mut config = CourierConfig::default();
        config.bot.system_prompt = self.system_prompt;
        config.gateway.api_key = Some("test-api-key".to_string());
        config.quota.daily_limit = self.daily_limit;
        config.context.history_limit = self.history_limit;
        config.storage.database_path = Some(db_path_str);

        let dispatcher = Dispatcher::new(
            channel.clone(),
            gateway.clone(),
            db.clone(),
            quota.clone(),
            config.clone(),
        );

        Ok(TestHarness {
            channel,
            gateway,
            quota,
            db,
            dispatcher,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    /// The mock messaging channel.
    pub channel: Arc<MockChannel>,
    /// The mock completion gateway.
    pub gateway: Arc<MockGateway>,
    /// The injected quota state.
    pub quota: Arc<QuotaTracker>,
    /// Handle to the temp SQLite database, for direct assertions.
    pub db: Database,
    /// The dispatcher under test.
    pub dispatcher: Dispatcher,
    /// The configuration the dispatcher was built with.
    pub config: CourierConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Start building a harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Deliver a plain text event from `sender` and return the outcome.
    pub async fn deliver(&self, sender: &str, body: &str) -> DispatchOutcome {
        self.deliver_event(InboundEvent {
            id: format!("evt-{}", uuid::Uuid::new_v4()),
            sender: sender.to_string(),
            body: body.to_string(),
            from_self: false,
            has_media: false,
            metadata: Some(format!(r#"{{"remote":"{sender}"}}"#)),
        })
        .await
    }

    /// Deliver a fully specified event and return the outcome.
    pub async fn deliver_event(&self, event: InboundEvent) -> DispatchOutcome {
        self.dispatcher.handle_event(event).await
    }
}
