// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger adapter trait for the external record-of-truth spreadsheet.

use async_trait::async_trait;

use crate::error::BrewlineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{NormalizedEntry, User};

/// Adapter for the external ledger confirmed orders are appended to.
///
/// Safe to call with partially unresolved line items: a row is still
/// written, unresolved items contribute to the goods text but not to the
/// total. Callers treat failures as log-only (acknowledged operational
/// gap; operators reconcile manually).
#[async_trait]
pub trait LedgerAdapter: PluginAdapter {
    /// Appends one row per deliverable entry of a confirmed order.
    async fn append_order(
        &self,
        user: &User,
        entries: &[NormalizedEntry],
        recorded_at: &str,
    ) -> Result<(), BrewlineError>;
}
