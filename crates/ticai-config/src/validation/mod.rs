//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::TicaiConfig;
use ticai_common::ConfigError;

use helpers::{validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TicaiConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_limits(&mut errors, config);
    validate_rate_limit(&mut errors, config);
    validate_ai(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_limits(errors: &mut Vec<String>, config: &TicaiConfig) {
    let limits = &config.limits;
    validate_range(errors, "limits.max_messages", limits.max_messages, 2, 1000);
    validate_range(
        errors,
        "limits.max_message_chars",
        limits.max_message_chars,
        1,
        4000,
    );
    validate_range(
        errors,
        "limits.conversation_started_at",
        limits.conversation_started_at,
        1,
        100,
    );
    if limits.conversation_started_at > limits.max_messages {
        errors.push(format!(
            "limits.conversation_started_at = {} exceeds limits.max_messages = {}",
            limits.conversation_started_at, limits.max_messages
        ));
    }
}

fn validate_rate_limit(errors: &mut Vec<String>, config: &TicaiConfig) {
    let rate = &config.rate_limit;
    validate_range(errors, "rate_limit.limit", rate.limit, 1, 1000);
    validate_range(
        errors,
        "rate_limit.window_seconds",
        rate.window_seconds,
        1,
        86400,
    );
    validate_range(errors, "rate_limit.tick_millis", rate.tick_millis, 10, 60000);
}

fn validate_ai(errors: &mut Vec<String>, config: &TicaiConfig) {
    let ai = &config.ai;
    if ai.base_url.trim().is_empty() {
        errors.push("ai.base_url must not be empty".to_string());
    }
    if ai.model.trim().is_empty() {
        errors.push("ai.model must not be empty".to_string());
    }
    validate_range(errors, "ai.max_tokens", ai.max_tokens, 16, 8192);
    validate_range_f64(errors, "ai.temperature", ai.temperature, 0.0, 2.0);
    validate_range(errors, "ai.timeout_secs", ai.timeout_secs, 1, 600);
}
