// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock ledger capturing appended orders.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use brewline_core::BrewlineError;
use brewline_core::traits::{LedgerAdapter, PluginAdapter};
use brewline_core::types::{AdapterType, HealthStatus, NormalizedEntry, User};

/// One captured ledger append.
#[derive(Debug, Clone)]
pub struct AppendedOrder {
    pub user_id: i64,
    pub organization: Option<String>,
    pub entry_count: usize,
    pub recorded_at: String,
}

/// A mock ledger for testing the admin-confirm path.
pub struct MockLedger {
    appended: Arc<Mutex<Vec<AppendedOrder>>>,
    fail: AtomicBool,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            appended: Arc::new(Mutex::new(Vec::new())),
            fail: AtomicBool::new(false),
        }
    }

    /// Make subsequent appends fail.
    pub fn fail_appends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub async fn appended(&self) -> Vec<AppendedOrder> {
        self.appended.lock().await.clone()
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockLedger {
    fn name(&self) -> &str {
        "mock-ledger"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Ledger
    }

    async fn health_check(&self) -> Result<HealthStatus, BrewlineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BrewlineError> {
        Ok(())
    }
}

#[async_trait]
impl LedgerAdapter for MockLedger {
    async fn append_order(
        &self,
        user: &User,
        entries: &[NormalizedEntry],
        recorded_at: &str,
    ) -> Result<(), BrewlineError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(BrewlineError::Ledger {
                message: "scripted ledger failure".into(),
                source: None,
            });
        }
        self.appended.lock().await.push(AppendedOrder {
            user_id: user.user_id,
            organization: user.organization.clone(),
            entry_count: entries.len(),
            recorded_at: recorded_at.to_string(),
        });
        Ok(())
    }
}
