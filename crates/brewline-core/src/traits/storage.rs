// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for users, products, and orders.

use async_trait::async_trait;

use crate::error::BrewlineError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Order, OrderStatus, Product, User};

/// Adapter for the persistence backend.
///
/// Conversation state is deliberately absent: it lives in the in-memory
/// session store and does not survive restarts. Only users, the product
/// assortment, and confirmed/pending orders are durable.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, pragmas).
    async fn initialize(&self) -> Result<(), BrewlineError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), BrewlineError>;

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, BrewlineError>;

    /// Inserts or updates a user record.
    async fn save_user(&self, user: &User) -> Result<(), BrewlineError>;

    async fn set_approval(&self, user_id: i64, approved: bool) -> Result<(), BrewlineError>;

    async fn get_all_products(&self) -> Result<Vec<Product>, BrewlineError>;

    /// Persists a customer-confirmed order payload, returning the new order id.
    async fn create_order(&self, user_id: i64, payload: &str) -> Result<i64, BrewlineError>;

    async fn get_order(&self, order_id: i64) -> Result<Option<Order>, BrewlineError>;

    /// Most recent order of the user still awaiting an admin.
    async fn find_latest_pending_order(
        &self,
        user_id: i64,
    ) -> Result<Option<Order>, BrewlineError>;

    async fn set_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<(), BrewlineError>;
}
