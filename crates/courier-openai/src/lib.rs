// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible completion gateway adapter for Courier.
//!
//! Wraps [`client::OpenAiClient`] behind the [`CompletionGateway`] trait:
//! turns go out as a chat-completions payload, the first choice's text comes
//! back, and an empty or malformed payload is reported as a gateway failure.

pub mod client;
pub mod types;

use async_trait::async_trait;
use courier_config::model::GatewayConfig;
use courier_core::{CompletionGateway, CompletionRequest, CompletionResponse, CourierError};

use crate::client::OpenAiClient;
use crate::types::{ApiMessage, ChatRequest};

/// Completion gateway backed by an OpenAI-compatible chat-completions API.
pub struct OpenAiGateway {
    client: OpenAiClient,
}

impl OpenAiGateway {
    /// Creates a gateway from configuration.
    ///
    /// Fails when the credential is absent; config validation normally
    /// catches that before this point.
    pub fn new(config: &GatewayConfig) -> Result<Self, CourierError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| CourierError::Config("gateway.api_key is not set".into()))?;
        let client = OpenAiClient::new(
            api_key,
            &config.base_url,
            config.timeout_secs,
            config.max_retries,
        )?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CourierError> {
        let chat_request = ChatRequest {
            model: request.model,
            messages: request
                .turns
                .iter()
                .map(|turn| ApiMessage {
                    role: turn.role.to_string(),
                    content: turn.content.clone(),
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
        };

        let response = self.client.complete_chat(&chat_request).await?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| CourierError::Gateway {
                message: "empty completion payload".into(),
                source: None,
            })?
            .to_string();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
        })
    }
}
