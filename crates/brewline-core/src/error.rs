// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Brewline order bot.

use thiserror::Error;

/// The primary error type used across all Brewline adapter traits and core operations.
#[derive(Debug, Error)]
pub enum BrewlineError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Notification channel errors (send/edit/delete failure, malformed update).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Order parser errors (API failure, token limits, unusable completion).
    #[error("parser error: {message}")]
    Parser {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// External ledger errors (append failure, auth rejection).
    #[error("ledger error: {message}")]
    Ledger {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An actor invoked an admin operation without being in the admin set.
    #[error("unauthorized action by {actor}")]
    Unauthorized { actor: i64 },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
