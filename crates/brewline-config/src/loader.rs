// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./brewline.toml` > `~/.config/brewline/brewline.toml`
//! > `/etc/brewline/brewline.toml` with environment variable overrides via
//! `BREWLINE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BrewlineConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/brewline/brewline.toml` (system-wide)
/// 3. `~/.config/brewline/brewline.toml` (user XDG config)
/// 4. `./brewline.toml` (local directory)
/// 5. `BREWLINE_*` environment variables
pub fn load_config() -> Result<BrewlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BrewlineConfig::default()))
        .merge(Toml::file("/etc/brewline/brewline.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("brewline/brewline.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("brewline.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<BrewlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BrewlineConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BrewlineConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BrewlineConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `BREWLINE_TELEGRAM_BOT_TOKEN`
/// must map to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("BREWLINE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: BREWLINE_TELEGRAM_BOT_TOKEN -> "telegram_bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("parser_", "parser.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("ledger_", "ledger.", 1)
            .replacen("server_", "server.", 1);
        mapped.into()
    })
}
