// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Product assortment queries.
//!
//! The assortment is operator-managed: rows arrive via `brewline
//! import-catalog`, not via the bot flow.

use brewline_core::BrewlineError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Product, UnitKind};

fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    let kind_str: String = row.get(2)?;
    let unit_kind = kind_str.parse::<UnitKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Product {
        good_id: row.get(0)?,
        name: row.get(1)?,
        unit_kind,
        price_cash: row.get(3)?,
        price_cashless: row.get(4)?,
        min_size: row.get(5)?,
    })
}

/// All products, ordered by id.
pub async fn get_all_products(db: &Database) -> Result<Vec<Product>, BrewlineError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT good_id, name, unit_kind, price_cash, price_cashless, min_size
                 FROM assortment ORDER BY good_id",
            )?;
            let rows = stmt.query_map([], row_to_product)?;
            let mut products = Vec::new();
            for row in rows {
                products.push(row?);
            }
            Ok(products)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or replace one product row.
pub async fn upsert_product(db: &Database, product: &Product) -> Result<(), BrewlineError> {
    let product = product.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO assortment (good_id, name, unit_kind, price_cash, price_cashless, min_size)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(good_id) DO UPDATE SET
                     name = excluded.name,
                     unit_kind = excluded.unit_kind,
                     price_cash = excluded.price_cash,
                     price_cashless = excluded.price_cashless,
                     min_size = excluded.min_size",
                params![
                    product.good_id,
                    product.name,
                    product.unit_kind.to_string(),
                    product.price_cash,
                    product.price_cashless,
                    product.min_size,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn gaus() -> Product {
        Product {
            good_id: 1,
            name: "Гаус".to_string(),
            unit_kind: UnitKind::VolumeLiters,
            price_cash: 95.0,
            price_cashless: 100.0,
            min_size: 30.0,
        }
    }

    #[tokio::test]
    async fn upsert_and_list_products() {
        let (db, _dir) = setup_db().await;

        upsert_product(&db, &gaus()).await.unwrap();
        upsert_product(
            &db,
            &Product {
                good_id: 2,
                name: "Сидр яблочный".to_string(),
                unit_kind: UnitKind::Piece,
                price_cash: 120.0,
                price_cashless: 130.0,
                min_size: 1.0,
            },
        )
        .await
        .unwrap();

        let products = get_all_products(&db).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0], gaus());
        assert_eq!(products[1].unit_kind, UnitKind::Piece);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn upsert_replaces_prices() {
        let (db, _dir) = setup_db().await;
        upsert_product(&db, &gaus()).await.unwrap();

        let mut updated = gaus();
        updated.price_cashless = 110.0;
        upsert_product(&db, &updated).await.unwrap();

        let products = get_all_products(&db).await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price_cashless, 110.0);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_assortment_lists_empty() {
        let (db, _dir) = setup_db().await;
        assert!(get_all_products(&db).await.unwrap().is_empty());
        db.close().await.unwrap();
    }
}
