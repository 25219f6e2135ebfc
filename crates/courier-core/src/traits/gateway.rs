// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion gateway trait for the hosted language-model service.

use async_trait::async_trait;

use crate::error::CourierError;
use crate::types::{CompletionRequest, CompletionResponse};

/// Injected capability over the chat-completion service.
///
/// Implementations own their timeout and bounded transient-retry policy; the
/// caller sees exactly one terminal result per request. A rate limit that
/// survives the retry budget surfaces as
/// [`CourierError::GatewayRateLimited`].
#[async_trait]
pub trait CompletionGateway: Send + Sync + 'static {
    /// Returns the human-readable name of this gateway.
    fn name(&self) -> &str;

    /// Sends a completion request and returns the full response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CourierError>;
}
