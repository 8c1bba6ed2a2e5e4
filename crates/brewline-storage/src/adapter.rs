// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`StorageAdapter`] implementation over the SQLite database.

use async_trait::async_trait;
use chrono::Utc;

use brewline_config::model::StorageConfig;
use brewline_core::BrewlineError;
use brewline_core::traits::{PluginAdapter, StorageAdapter};
use brewline_core::types::{AdapterType, HealthStatus, Order, OrderStatus, Product, User};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Constructed cheaply at startup; the database opens (and migrates) on
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: tokio::sync::OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: tokio::sync::OnceCell::new(),
        }
    }

    /// The open database handle, for operational tooling (catalog import).
    pub fn database(&self) -> Result<&Database, BrewlineError> {
        self.db
            .get()
            .ok_or_else(|| BrewlineError::Internal("storage not initialized".into()))
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, BrewlineError> {
        let Ok(db) = self.database() else {
            return Ok(HealthStatus::Unhealthy("storage not initialized".into()));
        };
        let ping = db
            .connection()
            .call(|conn| conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)))
            .await;
        match ping {
            Ok(1) => Ok(HealthStatus::Healthy),
            Ok(other) => Ok(HealthStatus::Degraded(format!("unexpected ping result {other}"))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("ping failed: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), BrewlineError> {
        self.close().await
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), BrewlineError> {
        self.db
            .get_or_try_init(|| Database::open(&self.config.database_path, self.config.wal_mode))
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), BrewlineError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
        }
        Ok(())
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, BrewlineError> {
        queries::users::get_user(self.database()?, user_id).await
    }

    async fn save_user(&self, user: &User) -> Result<(), BrewlineError> {
        queries::users::save_user(self.database()?, user).await
    }

    async fn set_approval(&self, user_id: i64, approved: bool) -> Result<(), BrewlineError> {
        queries::users::set_approval(self.database()?, user_id, approved).await
    }

    async fn get_all_products(&self) -> Result<Vec<Product>, BrewlineError> {
        queries::assortment::get_all_products(self.database()?).await
    }

    async fn create_order(&self, user_id: i64, payload: &str) -> Result<i64, BrewlineError> {
        let created_at = Utc::now().to_rfc3339();
        queries::orders::create_order(self.database()?, user_id, payload, &created_at).await
    }

    async fn get_order(&self, order_id: i64) -> Result<Option<Order>, BrewlineError> {
        queries::orders::get_order(self.database()?, order_id).await
    }

    async fn find_latest_pending_order(
        &self,
        user_id: i64,
    ) -> Result<Option<Order>, BrewlineError> {
        queries::orders::find_latest_pending_order(self.database()?, user_id).await
    }

    async fn set_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<(), BrewlineError> {
        queries::orders::set_order_status(self.database()?, order_id, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_storage() -> (SqliteStorage, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("test.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        let storage = SqliteStorage::new(config);
        storage.initialize().await.unwrap();
        (storage, dir)
    }

    fn make_user(user_id: i64) -> User {
        User {
            user_id,
            display_name: "Иван".to_string(),
            username: Some("ivan".to_string()),
            organization: Some("ООО Ромашка".to_string()),
            phone: None,
            approved: true,
            registered_at: "2026-08-04T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn adapter_roundtrips_users_and_orders() {
        let (storage, _dir) = setup_storage().await;

        storage.save_user(&make_user(42)).await.unwrap();
        let user = storage.get_user(42).await.unwrap().unwrap();
        assert!(user.approved);

        let order_id = storage
            .create_order(42, r#"[{"goods":{"1":2}}]"#)
            .await
            .unwrap();
        let order = storage.get_order(order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::PendingAdmin);

        let latest = storage.find_latest_pending_order(42).await.unwrap().unwrap();
        assert_eq!(latest.order_id, order_id);

        storage
            .set_order_status(order_id, OrderStatus::Confirmed)
            .await
            .unwrap();
        assert!(storage.find_latest_pending_order(42).await.unwrap().is_none());

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn uninitialized_storage_reports_unhealthy() {
        let config = StorageConfig {
            database_path: "unused.db".to_string(),
            wal_mode: false,
        };
        let storage = SqliteStorage::new(config);
        match storage.health_check().await.unwrap() {
            HealthStatus::Unhealthy(_) => {}
            other => panic!("expected unhealthy, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn initialized_storage_reports_healthy() {
        let (storage, _dir) = setup_storage().await;
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        storage.close().await.unwrap();
    }
}
