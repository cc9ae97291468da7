//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    let config = TicaiConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_zero_rate_limit() {
    let mut config = TicaiConfig::default();
    config.rate_limit.limit = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("rate_limit.limit"));
}

#[test]
fn catches_tick_too_fast() {
    let mut config = TicaiConfig::default();
    config.rate_limit.tick_millis = 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("rate_limit.tick_millis"));
}

#[test]
fn catches_message_cap_too_small() {
    let mut config = TicaiConfig::default();
    config.limits.max_messages = 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("limits.max_messages"));
}

#[test]
fn catches_started_threshold_above_cap() {
    let mut config = TicaiConfig::default();
    config.limits.max_messages = 4;
    config.limits.conversation_started_at = 6;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("exceeds limits.max_messages"));
}

#[test]
fn catches_temperature_out_of_range() {
    let mut config = TicaiConfig::default();
    config.ai.temperature = 3.5;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("ai.temperature"));
}

#[test]
fn catches_empty_model() {
    let mut config = TicaiConfig::default();
    config.ai.model = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("ai.model"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = TicaiConfig::default();
    config.rate_limit.window_seconds = 0;
    config.ai.timeout_secs = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("rate_limit.window_seconds"));
    assert!(err.contains("ai.timeout_secs"));
    assert!(err.contains("; "));
}
