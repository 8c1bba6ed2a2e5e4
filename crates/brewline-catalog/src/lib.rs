// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product assortment cache.
//!
//! Holds the product catalog read by both the pricing normalizer and the
//! order parser prompt. The assortment is fetched lazily from storage on
//! first use and memoized for the process lifetime; a price or name change
//! requires a restart or an explicit [`CatalogCache::invalidate`] call.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use brewline_core::BrewlineError;
use brewline_core::traits::StorageAdapter;
use brewline_core::types::Product;

/// Memoizing read-through cache over the stored product assortment.
///
/// A fetch failure propagates to the caller and is never cached. Two
/// concurrent first reads may both hit storage; both fill the cache with
/// the same rows, which is harmless.
pub struct CatalogCache {
    storage: Arc<dyn StorageAdapter>,
    cached: RwLock<Option<Arc<Vec<Product>>>>,
}

impl CatalogCache {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            storage,
            cached: RwLock::new(None),
        }
    }

    /// Returns the full assortment, fetching and memoizing it on first use.
    pub async fn assortment(&self) -> Result<Arc<Vec<Product>>, BrewlineError> {
        if let Some(products) = self.cached.read().await.as_ref() {
            return Ok(products.clone());
        }

        let products = Arc::new(self.storage.get_all_products().await?);
        debug!(count = products.len(), "assortment cached");

        let mut slot = self.cached.write().await;
        // A concurrent fetch may have filled the slot; the rows are the same.
        if slot.is_none() {
            *slot = Some(products.clone());
        }
        Ok(slot.as_ref().map(Arc::clone).unwrap_or(products))
    }

    /// Looks up a single product by id.
    pub async fn lookup(&self, good_id: i64) -> Result<Option<Product>, BrewlineError> {
        let products = self.assortment().await?;
        Ok(products.iter().find(|p| p.good_id == good_id).cloned())
    }

    /// Drops the memoized assortment so the next read refetches.
    ///
    /// Exposed for operational use (catalog imports, manual price updates).
    pub async fn invalidate(&self) {
        let mut slot = self.cached.write().await;
        if slot.take().is_some() {
            debug!("assortment cache invalidated");
        }
    }
}
