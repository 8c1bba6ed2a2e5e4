// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage adapter for agent-level tests.
//!
//! Mirrors the SQLite adapter's observable behavior (upserts, latest
//! pending lookup) without touching disk. A failure toggle exercises the
//! generic retry-later paths.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use brewline_core::BrewlineError;
use brewline_core::traits::{PluginAdapter, StorageAdapter};
use brewline_core::types::{
    AdapterType, HealthStatus, Order, OrderStatus, Product, User,
};

/// HashMap-backed [`StorageAdapter`].
pub struct MemoryStorage {
    users: Arc<Mutex<HashMap<i64, User>>>,
    orders: Arc<Mutex<Vec<Order>>>,
    products: Arc<Mutex<Vec<Product>>>,
    next_order_id: AtomicI64,
    fail: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            orders: Arc::new(Mutex::new(Vec::new())),
            products: Arc::new(Mutex::new(Vec::new())),
            next_order_id: AtomicI64::new(1),
            fail: AtomicBool::new(false),
        }
    }

    /// Seed the product assortment.
    pub async fn seed_products(&self, products: Vec<Product>) {
        *self.products.lock().await = products;
    }

    /// Make every subsequent call fail with a storage error.
    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// All persisted orders, in insertion order.
    pub async fn orders(&self) -> Vec<Order> {
        self.orders.lock().await.clone()
    }

    fn check(&self) -> Result<(), BrewlineError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(BrewlineError::Storage {
                source: Box::new(std::io::Error::other("scripted storage failure")),
            });
        }
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory-storage"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, BrewlineError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BrewlineError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn initialize(&self) -> Result<(), BrewlineError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), BrewlineError> {
        Ok(())
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, BrewlineError> {
        self.check()?;
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn save_user(&self, user: &User) -> Result<(), BrewlineError> {
        self.check()?;
        self.users.lock().await.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn set_approval(&self, user_id: i64, approved: bool) -> Result<(), BrewlineError> {
        self.check()?;
        if let Some(user) = self.users.lock().await.get_mut(&user_id) {
            user.approved = approved;
        }
        Ok(())
    }

    async fn get_all_products(&self) -> Result<Vec<Product>, BrewlineError> {
        self.check()?;
        Ok(self.products.lock().await.clone())
    }

    async fn create_order(&self, user_id: i64, payload: &str) -> Result<i64, BrewlineError> {
        self.check()?;
        let order_id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
        self.orders.lock().await.push(Order {
            order_id,
            user_id,
            payload: payload.to_string(),
            status: OrderStatus::PendingAdmin,
            created_at: chrono::Utc::now().to_rfc3339(),
        });
        Ok(order_id)
    }

    async fn get_order(&self, order_id: i64) -> Result<Option<Order>, BrewlineError> {
        self.check()?;
        Ok(self
            .orders
            .lock()
            .await
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned())
    }

    async fn find_latest_pending_order(
        &self,
        user_id: i64,
    ) -> Result<Option<Order>, BrewlineError> {
        self.check()?;
        Ok(self
            .orders
            .lock()
            .await
            .iter()
            .filter(|o| o.user_id == user_id && o.status == OrderStatus::PendingAdmin)
            .next_back()
            .cloned())
    }

    async fn set_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<(), BrewlineError> {
        self.check()?;
        if let Some(order) = self
            .orders
            .lock()
            .await
            .iter_mut()
            .find(|o| o.order_id == order_id)
        {
            order.status = status;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_user(user_id: i64, approved: bool) -> User {
        User {
            user_id,
            display_name: "Тест".into(),
            username: None,
            organization: Some("ООО Тест".into()),
            phone: None,
            approved,
            registered_at: "2026-08-04T00:00:00Z".into(),
        }
    }

    #[tokio::test]
    async fn latest_pending_order_matches_sqlite_semantics() {
        let storage = MemoryStorage::new();
        storage.save_user(&make_user(1, true)).await.unwrap();

        let first = storage.create_order(1, "[]").await.unwrap();
        let second = storage.create_order(1, "[]").await.unwrap();
        assert_ne!(first, second);

        let latest = storage.find_latest_pending_order(1).await.unwrap().unwrap();
        assert_eq!(latest.order_id, second);

        storage
            .set_order_status(second, OrderStatus::Confirmed)
            .await
            .unwrap();
        let latest = storage.find_latest_pending_order(1).await.unwrap().unwrap();
        assert_eq!(latest.order_id, first);
    }

    #[tokio::test]
    async fn fail_all_poisons_every_call() {
        let storage = MemoryStorage::new();
        storage.fail_all();
        assert!(storage.get_user(1).await.is_err());
        assert!(storage.create_order(1, "[]").await.is_err());
    }
}
