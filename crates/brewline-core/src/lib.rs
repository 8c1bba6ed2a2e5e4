// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Brewline order bot.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Brewline workspace. All collaborator
//! adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::BrewlineError;
pub use types::{AdapterType, ChatRef, HealthStatus, PromptRef};

// Re-export all adapter traits at crate root.
pub use traits::{ChannelAdapter, LedgerAdapter, ParserAdapter, PluginAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn brewline_error_has_all_variants() {
        // Verify all 8 error variants exist and can be constructed.
        let _config = BrewlineError::Config("test".into());
        let _storage = BrewlineError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = BrewlineError::Channel {
            message: "test".into(),
            source: None,
        };
        let _parser = BrewlineError::Parser {
            message: "test".into(),
            source: None,
        };
        let _ledger = BrewlineError::Ledger {
            message: "test".into(),
            source: None,
        };
        let _unauthorized = BrewlineError::Unauthorized { actor: 42 };
        let _timeout = BrewlineError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = BrewlineError::Internal("test".into());
    }

    #[test]
    fn adapter_type_has_four_variants() {
        let variants = [
            AdapterType::Channel,
            AdapterType::Parser,
            AdapterType::Storage,
            AdapterType::Ledger,
        ];

        assert_eq!(variants.len(), 4, "AdapterType must have exactly 4 variants");

        // Verify Display and FromStr round-trip for all variants.
        for variant in &variants {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // If any trait module is missing or has a compile error, this test
        // won't compile.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_parser_adapter<T: ParserAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_ledger_adapter<T: LedgerAdapter>() {}
    }
}
