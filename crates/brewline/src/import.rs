// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `brewline import-catalog` command implementation.
//!
//! Loads product rows from a TOML file into the assortment table. A
//! running bot picks the change up on its next restart (the in-process
//! catalog cache memoizes for the process lifetime).

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use brewline_config::BrewlineConfig;
use brewline_core::BrewlineError;
use brewline_core::traits::StorageAdapter;
use brewline_core::types::Product;
use brewline_storage::SqliteStorage;
use brewline_storage::queries::assortment;

/// The on-disk catalog file shape: a list of `[[product]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    product: Vec<Product>,
}

/// Imports (upserting by id) the products listed in `path`.
pub async fn run_import(config: &BrewlineConfig, path: &Path) -> Result<(), BrewlineError> {
    let products = read_catalog_file(path)?;
    if products.is_empty() {
        println!("no products found in {}", path.display());
        return Ok(());
    }

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;

    let db = storage.database()?;
    for product in &products {
        assortment::upsert_product(db, product).await?;
        info!(good_id = product.good_id, name = %product.name, "product imported");
    }

    storage.close().await?;
    println!(
        "imported {} product(s) into {}",
        products.len(),
        config.storage.database_path
    );
    Ok(())
}

fn read_catalog_file(path: &Path) -> Result<Vec<Product>, BrewlineError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BrewlineError::Config(format!("cannot read catalog file {}: {e}", path.display()))
    })?;
    let catalog: CatalogFile = toml::from_str(&content).map_err(|e| {
        BrewlineError::Config(format!("invalid catalog file {}: {e}", path.display()))
    })?;
    Ok(catalog.product)
}
