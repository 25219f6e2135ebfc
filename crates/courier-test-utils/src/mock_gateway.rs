// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion gateway for deterministic testing.
//!
//! `MockGateway` implements `CompletionGateway` with a scripted FIFO of
//! outcomes and captures every request it receives, so tests can assert on
//! the assembled turn sequences as well as on the dispatcher's behavior
//! under gateway failures.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use courier_core::traits::gateway::CompletionGateway;
use courier_core::{CompletionRequest, CompletionResponse, CourierError};

/// One scripted gateway outcome.
#[derive(Debug, Clone)]
enum ScriptedOutcome {
    Reply(String),
    RateLimited(Option<u64>),
    Failure(String),
}

/// A mock completion gateway with scripted outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, a default
/// "mock completion" text is returned.
pub struct MockGateway {
    script: Arc<Mutex<VecDeque<ScriptedOutcome>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockGateway {
    /// Create a new mock gateway with an empty script.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock gateway pre-loaded with successful responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        let gateway = Self::new();
        {
            let script = gateway.script.clone();
            let mut queue = script.try_lock().expect("fresh mutex");
            queue.extend(responses.into_iter().map(ScriptedOutcome::Reply));
        }
        gateway
    }

    /// Create a mock gateway whose first call fails with a non-rate-limit error.
    pub fn with_failure(message: &str) -> Self {
        let gateway = Self::new();
        {
            let script = gateway.script.clone();
            let mut queue = script.try_lock().expect("fresh mutex");
            queue.push_back(ScriptedOutcome::Failure(message.to_string()));
        }
        gateway
    }

    /// Append a successful response to the script.
    pub async fn push_response(&self, text: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(ScriptedOutcome::Reply(text.into()));
    }

    /// Append a terminal rate-limit outcome to the script.
    pub async fn push_rate_limited(&self, retry_after_secs: Option<u64>) {
        self.script
            .lock()
            .await
            .push_back(ScriptedOutcome::RateLimited(retry_after_secs));
    }

    /// Append a non-rate-limit failure to the script.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(ScriptedOutcome::Failure(message.into()));
    }

    /// All requests received so far, in call order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of requests received so far.
    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionGateway for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CourierError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);

        let outcome = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| ScriptedOutcome::Reply("mock completion".to_string()));

        match outcome {
            ScriptedOutcome::Reply(text) => Ok(CompletionResponse {
                id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
                content: text,
                model,
            }),
            ScriptedOutcome::RateLimited(retry_after_secs) => {
                Err(CourierError::GatewayRateLimited { retry_after_secs })
            }
            ScriptedOutcome::Failure(message) => Err(CourierError::Gateway {
                message,
                source: None,
            }),
        }
    }
}
