// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Courier relay bot.

use thiserror::Error;

/// The primary error type used across Courier's trait seams and core operations.
///
/// Gateway failures carry their own classification: a terminal rate limit is a
/// distinct variant so the dispatcher can pin the user's quota and word the
/// reply from the `retry-after` hint.
#[derive(Debug, Error)]
pub enum CourierError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database open, query failure, migration failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging channel errors (bridge connection, malformed frame, send failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Completion gateway errors other than a terminal rate limit
    /// (HTTP failure, malformed or empty payload, non-retryable status).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The completion gateway reported a rate limit after retries were exhausted.
    ///
    /// `retry_after_secs` carries the provider's `retry-after` hint when present.
    #[error("gateway rate limited (retry after {retry_after_secs:?} seconds)")]
    GatewayRateLimited { retry_after_secs: Option<u64> },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
