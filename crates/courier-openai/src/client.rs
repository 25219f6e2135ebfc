// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat-completions endpoints.
//!
//! Provides [`OpenAiClient`] which handles request construction, bearer
//! authentication, bounded transient-error retry, and terminal rate-limit
//! classification. The retry budget lives entirely in this client; callers
//! see exactly one terminal result per request.

use std::time::Duration;

use courier_core::CourierError;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// Path of the chat-completions resource under the configured base URL.
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Delay between transient-error retry attempts.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// HTTP client for an OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
}

impl OpenAiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `api_key` - bearer credential for the endpoint
    /// * `base_url` - endpoint base, without the `/chat/completions` path
    /// * `timeout_secs` - per-request timeout
    /// * `max_retries` - bounded transient-failure retries
    pub fn new(
        api_key: &str,
        base_url: &str,
        timeout_secs: u64,
        max_retries: u32,
    ) -> Result<Self, CourierError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {api_key}");
        let mut auth = HeaderValue::from_str(&bearer)
            .map_err(|e| CourierError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(timeout_secs);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| CourierError::Gateway {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            max_retries,
        })
    }

    /// Sends a chat-completions request and returns the parsed response.
    ///
    /// Transient statuses (429, 500, 502, 503) are retried up to the
    /// configured budget with a short delay. A 429 that survives the budget
    /// becomes [`CourierError::GatewayRateLimited`] carrying the
    /// `retry-after` hint; any other terminal status becomes a gateway error
    /// with the API's error message when the body parses.
    pub async fn complete_chat(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, CourierError> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let response = match self.client.post(&url).json(request).send().await {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    return Err(CourierError::Timeout {
                        duration: self.timeout,
                    });
                }
                Err(e) => {
                    return Err(CourierError::Gateway {
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    });
                }
            };

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| CourierError::Gateway {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| CourierError::Gateway {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(CourierError::Gateway {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let retry_after = parse_retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                warn!(retry_after_secs = ?retry_after, "rate limit is terminal");
                return Err(CourierError::GatewayRateLimited {
                    retry_after_secs: retry_after,
                });
            }

            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!("API error: {}", api_err.error.message)
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(CourierError::Gateway {
                message,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| CourierError::Gateway {
            message: "completion request failed after retries".into(),
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

/// Parse a `retry-after` header as whole seconds, if present and numeric.
fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}
