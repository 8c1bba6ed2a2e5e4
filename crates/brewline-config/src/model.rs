// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Brewline order bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Brewline configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values;
/// `serve` refuses to start without the credentials validation requires.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrewlineConfig {
    /// Process identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Order parser (LLM) settings.
    #[serde(default)]
    pub parser: ParserConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// External order ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Health/readiness HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot process.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "brewline".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required to serve.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// User ids allowed to approve registrations and confirm orders.
    #[serde(default)]
    pub admin_ids: Vec<i64>,
}

/// Order parser (LLM) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
    /// API key for the text-understanding service. Required to serve.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model to use for order parsing.
    #[serde(default = "default_parser_model")]
    pub model: String,

    /// Maximum tokens to generate per parse.
    #[serde(default = "default_parser_max_tokens")]
    pub max_tokens: u32,

    /// API version header value.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Hard deadline for one parse call, in seconds. A hung call degrades
    /// to a user-visible apology instead of blocking the user's turn.
    #[serde(default = "default_parser_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_parser_model(),
            max_tokens: default_parser_max_tokens(),
            api_version: default_api_version(),
            timeout_secs: default_parser_timeout_secs(),
        }
    }
}

fn default_parser_model() -> String {
    "claude-haiku-4-5-20250901".to_string()
}

fn default_parser_max_tokens() -> u32 {
    900
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_parser_timeout_secs() -> u64 {
    30
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("brewline").join("brewline.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("brewline.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// External order ledger (Google Sheets) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Spreadsheet to append confirmed orders to. `None` disables the ledger.
    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    /// Worksheet (tab) name within the spreadsheet.
    #[serde(default = "default_worksheet_name")]
    pub worksheet_name: String,

    /// OAuth bearer token used for the append calls.
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            worksheet_name: default_worksheet_name(),
            api_token: None,
        }
    }
}

fn default_worksheet_name() -> String {
    "Заказы".to_string()
}

/// Health/readiness HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the health server to.
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to bind the health server to.
    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}
