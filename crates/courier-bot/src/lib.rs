// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatcher loop and per-event processing for the Courier relay bot.
//!
//! The [`Dispatcher`] is the central coordinator:
//! - receives inbound events from the channel adapter
//! - filters ineligible traffic
//! - enforces the per-user daily quota
//! - persists the exchange and assembles the rolling context window
//! - calls the completion gateway and replies
//!
//! No error crosses the boundary of a single event: every failure is
//! converted to a classified [`DispatchOutcome`] plus a best-effort
//! user-facing reply.

pub mod context;
pub mod filter;
pub mod quota;
pub mod shutdown;

use std::sync::Arc;

use courier_config::CourierConfig;
use courier_core::{
    ChannelAdapter, ChatRole, CompletionGateway, CompletionRequest, CourierError, InboundEvent,
    Message, OutboundReply,
};
use courier_storage::Database;
use courier_storage::queries::{messages, users};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::filter::FilterReason;
use crate::quota::{Admission, QuotaTracker};

/// Reply sent when the completion gateway fails for a reason other than a
/// rate limit.
const GATEWAY_FAILURE_REPLY: &str = "Sorry, I encountered an error. Please try again later.";

/// Fallback reply for unclassified failures anywhere in event processing.
const FALLBACK_REPLY: &str =
    "Sorry, I encountered an error processing your message. Please try again later.";

/// Wait hint assumed when the gateway rate-limits without a `retry-after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 86_400;

/// Metadata bag stored with assistant messages to mark bot origin.
const ASSISTANT_METADATA: &str = r#"{"from_self":true}"#;

/// Classified result of handling one inbound event.
///
/// Tests assert on this instead of log output; the dispatcher itself never
/// returns an error to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Event was ineligible and discarded without side effects.
    Filtered(FilterReason),
    /// The user's daily quota denied the request.
    QuotaDenied,
    /// A completion was sent and both turns persisted.
    Replied,
    /// The gateway reported a terminal rate limit; the user's quota is pinned.
    RateLimited,
    /// The gateway failed for another reason.
    GatewayFailed,
    /// An unclassified failure; the fallback apology was attempted.
    Failed,
}

/// Orchestrates one inbound event at a time from channel to reply.
pub struct Dispatcher {
    channel: Arc<dyn ChannelAdapter>,
    gateway: Arc<dyn CompletionGateway>,
    db: Database,
    quota: Arc<QuotaTracker>,
    config: CourierConfig,
}

impl Dispatcher {
    /// Creates a dispatcher over the given adapters and injected quota state.
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        gateway: Arc<dyn CompletionGateway>,
        db: Database,
        quota: Arc<QuotaTracker>,
        config: CourierConfig,
    ) -> Self {
        info!(bot_name = config.bot.name.as_str(), "dispatcher initialized");
        Self {
            channel,
            gateway,
            db,
            quota,
            config,
        }
    }

    /// Runs the receive loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), CourierError> {
        info!("dispatcher running");

        loop {
            tokio::select! {
                event = self.channel.receive() => {
                    match event {
                        Ok(event) => {
                            let outcome = self.handle_event(event).await;
                            debug!(?outcome, "event handled");
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping dispatcher");
                    break;
                }
            }
        }

        info!("dispatcher stopped");
        Ok(())
    }

    /// Handles a single inbound event; never returns an error.
    pub async fn handle_event(&self, event: InboundEvent) -> DispatchOutcome {
        if let Some(reason) = filter::classify(&event) {
            info!(sender = event.sender.as_str(), %reason, "ignoring inbound event");
            return DispatchOutcome::Filtered(reason);
        }

        match self.process(&event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, sender = event.sender.as_str(), "failed to process inbound event");
                self.send_best_effort(&event.sender, FALLBACK_REPLY).await;
                DispatchOutcome::Failed
            }
        }
    }

    /// The fallible middle of event handling: identify, admit, persist,
    /// assemble, complete, reply.
    async fn process(&self, event: &InboundEvent) -> Result<DispatchOutcome, CourierError> {
        let user = users::find_or_create(&self.db, &event.sender).await?;
        let session_id = uuid::Uuid::new_v4().to_string();

        if let Admission::Denied { retry_in_hours } = self.quota.admit(&user.id) {
            info!(
                user_id = user.id.as_str(),
                retry_in_hours, "daily quota exhausted"
            );
            self.channel
                .send(OutboundReply {
                    to: event.sender.clone(),
                    content: quota_denied_message(retry_in_hours),
                })
                .await?;
            return Ok(DispatchOutcome::QuotaDenied);
        }

        // History is read before the current turn is recorded so the turn
        // appears exactly once in the gateway payload.
        let history =
            context::build_context(&self.db, &event.sender, self.config.context.history_limit)
                .await;

        let inbound_row = Message {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            handle: event.sender.clone(),
            content: event.body.clone(),
            role: ChatRole::User,
            session_id: Some(session_id.clone()),
            metadata: event.metadata.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        messages::insert_message(&self.db, &inbound_row).await?;
        users::increment_message_count(&self.db, &user.id).await?;

        if let Err(e) = self.channel.send_typing(&event.sender).await {
            debug!(error = %e, "failed to send typing indicator");
        }

        let request = CompletionRequest {
            model: self.config.gateway.model.clone(),
            turns: context::assemble_turns(&self.config.bot.system_prompt, history, &event.body),
            temperature: self.config.gateway.temperature,
            max_tokens: self.config.gateway.max_tokens,
            top_p: self.config.gateway.top_p,
        };

        match self.gateway.complete(request).await {
            Ok(completion) => {
                self.channel
                    .send(OutboundReply {
                        to: event.sender.clone(),
                        content: completion.content.clone(),
                    })
                    .await?;

                let reply_row = Message {
                    id: uuid::Uuid::new_v4().to_string(),
                    user_id: user.id.clone(),
                    handle: event.sender.clone(),
                    content: completion.content,
                    role: ChatRole::Assistant,
                    session_id: Some(session_id),
                    metadata: Some(ASSISTANT_METADATA.to_string()),
                    created_at: chrono::Utc::now().to_rfc3339(),
                };
                messages::insert_message(&self.db, &reply_row).await?;

                info!(
                    user_id = user.id.as_str(),
                    session_id = reply_row.session_id.as_deref().unwrap_or_default(),
                    "replied"
                );
                Ok(DispatchOutcome::Replied)
            }
            Err(CourierError::GatewayRateLimited { retry_after_secs }) => {
                warn!(
                    user_id = user.id.as_str(),
                    retry_after_secs, "gateway rate limited, pinning user quota until reset"
                );
                self.quota.force_exhaust(&user.id);

                let hours = retry_after_secs
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
                    .div_ceil(3600);
                self.send_best_effort(&event.sender, &rate_limited_message(hours))
                    .await;
                Ok(DispatchOutcome::RateLimited)
            }
            Err(e) => {
                error!(error = %e, user_id = user.id.as_str(), "completion gateway call failed");
                self.send_best_effort(&event.sender, GATEWAY_FAILURE_REPLY)
                    .await;
                Ok(DispatchOutcome::GatewayFailed)
            }
        }
    }

    /// Sends a failure-path reply; a send failure here is logged and dropped.
    async fn send_best_effort(&self, to: &str, text: &str) {
        let reply = OutboundReply {
            to: to.to_string(),
            content: text.to_string(),
        };
        if let Err(e) = self.channel.send(reply).await {
            error!(error = %e, to, "failed to send error reply");
        }
    }
}

/// User-facing denial message for an exhausted quota window.
fn quota_denied_message(retry_in_hours: u64) -> String {
    format!("Daily message limit reached. Please try again in {retry_in_hours} hours.")
}

/// User-facing message when the gateway itself is rate limited.
fn rate_limited_message(retry_in_hours: u64) -> String {
    format!(
        "Sorry, I encountered an error. API rate limit reached. Please try again in {retry_in_hours} hours."
    )
}
