// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-empty paths, and sane
//! timeout values.

use crate::diagnostic::ConfigError;
use crate::model::BrewlineConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BrewlineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate server.host looks like a valid IP or hostname
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.parser.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "parser.max_tokens must be greater than zero".to_string(),
        });
    }

    if config.parser.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "parser.timeout_secs must be greater than zero".to_string(),
        });
    }

    // Duplicate admin ids are almost certainly a config mistake.
    let mut seen = std::collections::HashSet::new();
    for id in &config.telegram.admin_ids {
        if !seen.insert(id) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate admin id `{id}` in telegram.admin_ids"),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Additional requirements for running the bot (`brewline serve`).
///
/// Commands that never talk to Telegram or the parser (catalog import,
/// config inspection) skip these.
pub fn validate_for_serve(config: &BrewlineConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    match &config.telegram.bot_token {
        Some(token) if !token.trim().is_empty() => {}
        _ => errors.push(ConfigError::Validation {
            message: "telegram.bot_token is required to serve".to_string(),
        }),
    }

    match &config.parser.api_key {
        Some(key) if !key.trim().is_empty() => {}
        _ => errors.push(ConfigError::Validation {
            message: "parser.api_key is required to serve".to_string(),
        }),
    }

    if config.telegram.admin_ids.is_empty() {
        errors.push(ConfigError::Validation {
            message: "telegram.admin_ids must list at least one admin to serve".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
