// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parser adapter trait for the external text-understanding service.

use async_trait::async_trait;

use crate::error::BrewlineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::DraftEntry;

/// Adapter for the service that turns free-form order text into draft entries.
///
/// Implementations fail closed: when the upstream returns something
/// unusable, `parse` yields a single note-only entry carrying a fixed
/// user-facing apology instead of propagating the malformation. An `Err`
/// therefore only signals a transport-level breakdown the caller may want
/// to time out or retry on.
#[async_trait]
pub trait ParserAdapter: PluginAdapter {
    /// Parses order text, with optional prior messages as context.
    async fn parse(
        &self,
        text: &str,
        prior_messages: &[String],
    ) -> Result<Vec<DraftEntry>, BrewlineError>;
}
