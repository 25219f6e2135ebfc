// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. The two required external settings (gateway credential and
//! store path) are enforced here so startup fails fast with a rendered
//! diagnostic instead of a mid-flight error.

use crate::diagnostic::ConfigError;
use crate::model::CourierConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CourierConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    match &config.gateway.api_key {
        None => errors.push(ConfigError::MissingKey {
            key: "gateway.api_key".to_string(),
        }),
        Some(key) if key.trim().is_empty() => errors.push(ConfigError::Validation {
            message: "gateway.api_key must not be empty".to_string(),
        }),
        Some(_) => {}
    }

    match &config.storage.database_path {
        None => errors.push(ConfigError::MissingKey {
            key: "storage.database_path".to_string(),
        }),
        Some(path) if path.trim().is_empty() => errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        }),
        Some(_) => {}
    }

    if config.gateway.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.base_url must not be empty".to_string(),
        });
    }

    if !(0.0..=2.0).contains(&config.gateway.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "gateway.temperature must be between 0.0 and 2.0, got {}",
                config.gateway.temperature
            ),
        });
    }

    if !(0.0..=1.0).contains(&config.gateway.top_p) {
        errors.push(ConfigError::Validation {
            message: format!(
                "gateway.top_p must be between 0.0 and 1.0, got {}",
                config.gateway.top_p
            ),
        });
    }

    if config.gateway.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.max_tokens must be at least 1".to_string(),
        });
    }

    if config.gateway.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.quota.daily_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "quota.daily_limit must be at least 1".to_string(),
        });
    }

    if config.context.history_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "context.history_limit must be at least 1".to_string(),
        });
    }

    if config.bridge.url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "bridge.url must not be empty".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
