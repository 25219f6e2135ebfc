// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Courier configuration system.

use courier_config::diagnostic::{ConfigError, suggest_key};
use courier_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_courier_config() {
    let toml = r#"
[bot]
name = "test-bot"
log_level = "debug"
system_prompt = "You are a test assistant."

[gateway]
api_key = "ghp-123"
base_url = "https://example.test"
model = "gpt-4o-mini"
temperature = 0.5
max_tokens = 200
top_p = 0.9
timeout_secs = 10
max_retries = 2

[quota]
daily_limit = 20

[context]
history_limit = 8

[storage]
database_path = "/tmp/test.db"
destructive_resync = true

[bridge]
url = "ws://localhost:9999"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "test-bot");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.bot.system_prompt, "You are a test assistant.");
    assert_eq!(config.gateway.api_key.as_deref(), Some("ghp-123"));
    assert_eq!(config.gateway.base_url, "https://example.test");
    assert_eq!(config.gateway.model, "gpt-4o-mini");
    assert_eq!(config.gateway.max_tokens, 200);
    assert_eq!(config.gateway.timeout_secs, 10);
    assert_eq!(config.gateway.max_retries, 2);
    assert_eq!(config.quota.daily_limit, 20);
    assert_eq!(config.context.history_limit, 8);
    assert_eq!(config.storage.database_path.as_deref(), Some("/tmp/test.db"));
    assert!(config.storage.destructive_resync);
    assert_eq!(config.bridge.url, "ws://localhost:9999");
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.bot.name, "courier");
    assert_eq!(config.bot.log_level, "info");
    assert!(config.gateway.api_key.is_none());
    assert_eq!(config.gateway.model, "gpt-4o");
    assert_eq!(config.gateway.temperature, 0.7);
    assert_eq!(config.gateway.max_tokens, 150);
    assert_eq!(config.gateway.top_p, 1.0);
    assert_eq!(config.quota.daily_limit, 45);
    assert_eq!(config.context.history_limit, 5);
    assert!(config.storage.database_path.is_none());
    assert!(!config.storage.destructive_resync);
}

/// Unknown field in a section produces a deserialization error.
#[test]
fn unknown_field_in_gateway_produces_error() {
    let toml = r#"
[gateway]
api_kye = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("api_kye"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// The high-level entry point turns an unknown key into a rich diagnostic
/// with a typo suggestion.
#[test]
fn load_and_validate_str_suggests_correction_for_typo() {
    let toml = r#"
[gateway]
api_key = "k"
modle = "gpt-4o"

[storage]
database_path = "/tmp/t.db"
"#;

    let errors = load_and_validate_str(toml).expect_err("typo should be rejected");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key, suggestion, ..
            } => Some((key.clone(), suggestion.clone())),
            _ => None,
        })
        .expect("should report an unknown key");
    assert_eq!(unknown.0, "modle");
    assert_eq!(unknown.1.as_deref(), Some("model"));
}

/// A complete config with both required settings validates cleanly.
#[test]
fn required_settings_present_validates() {
    let toml = r#"
[gateway]
api_key = "ghp-123"

[storage]
database_path = "/tmp/courier.db"
"#;
    let config = load_and_validate_str(toml).expect("required settings present");
    assert_eq!(config.gateway.api_key.as_deref(), Some("ghp-123"));
}

/// Absent required settings are reported as missing keys.
#[test]
fn absent_required_settings_are_reported() {
    let errors = load_and_validate_str("").expect_err("required settings absent");
    let missing: Vec<&str> = errors
        .iter()
        .filter_map(|e| match e {
            ConfigError::MissingKey { key } => Some(key.as_str()),
            _ => None,
        })
        .collect();
    assert!(missing.contains(&"gateway.api_key"));
    assert!(missing.contains(&"storage.database_path"));
}

/// Wrong value type is reported as an invalid-type diagnostic.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[quota]
daily_limit = "many"
"#;
    let errors = load_and_validate_str(toml).expect_err("string is not a number");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Other(_))),
        "expected a type error, got: {errors:?}"
    );
}

/// Fuzzy suggestion helper is exposed and behaves sensibly.
#[test]
fn suggest_key_is_reexported_and_works() {
    assert_eq!(
        suggest_key("daily_limt", &["daily_limit"]),
        Some("daily_limit".to_string())
    );
}
