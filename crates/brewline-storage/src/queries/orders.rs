// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order CRUD operations.

use brewline_core::BrewlineError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Order, OrderStatus};

fn row_to_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    let status_str: String = row.get(3)?;
    let status = status_str.parse::<OrderStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Order {
        order_id: row.get(0)?,
        user_id: row.get(1)?,
        payload: row.get(2)?,
        status,
        created_at: row.get(4)?,
    })
}

/// Insert a new `pending_admin` order, returning its id.
pub async fn create_order(
    db: &Database,
    user_id: i64,
    payload: &str,
    created_at: &str,
) -> Result<i64, BrewlineError> {
    let payload = payload.to_string();
    let created_at = created_at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO orders (user_id, payload, status, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    user_id,
                    payload,
                    OrderStatus::PendingAdmin.to_string(),
                    created_at
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an order by id.
pub async fn get_order(db: &Database, order_id: i64) -> Result<Option<Order>, BrewlineError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT order_id, user_id, payload, status, created_at
                 FROM orders WHERE order_id = ?1",
            )?;
            let result = stmt.query_row(params![order_id], row_to_order);
            match result {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Most recent `pending_admin` order of a user, if any.
pub async fn find_latest_pending_order(
    db: &Database,
    user_id: i64,
) -> Result<Option<Order>, BrewlineError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT order_id, user_id, payload, status, created_at
                 FROM orders WHERE user_id = ?1 AND status = ?2
                 ORDER BY created_at DESC, order_id DESC LIMIT 1",
            )?;
            let result = stmt.query_row(
                params![user_id, OrderStatus::PendingAdmin.to_string()],
                row_to_order,
            );
            match result {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update an order's status.
pub async fn set_order_status(
    db: &Database,
    order_id: i64,
    status: OrderStatus,
) -> Result<(), BrewlineError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE orders SET status = ?1 WHERE order_id = ?2",
                params![status.to_string(), order_id],
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

    use crate::models::User;
    use crate::queries::users::save_user;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        // Orders reference users; seed one.
        save_user(
            &db,
            &User {
                user_id: 42,
                display_name: "Иван".to_string(),
                username: None,
                organization: None,
                phone: None,
                approved: true,
                registered_at: "2026-08-04T00:00:00Z".to_string(),
            },
        )
        .await
        .unwrap();

        (db, dir)
    }

    const PAYLOAD: &str = r#"[{"address":"Ленина 4","goods":{"1":2}}]"#;

    #[tokio::test]
    async fn create_and_get_order_roundtrips() {
        let (db, _dir) = setup_db().await;

        let order_id = create_order(&db, 42, PAYLOAD, "2026-08-04T10:00:00Z")
            .await
            .unwrap();
        let order = get_order(&db, order_id).await.unwrap().unwrap();

        assert_eq!(order.user_id, 42);
        assert_eq!(order.payload, PAYLOAD);
        assert_eq!(order.status, OrderStatus::PendingAdmin);
        assert_eq!(order.created_at, "2026-08-04T10:00:00Z");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_nonexistent_order_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_order(&db, 999).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn latest_pending_order_prefers_newest() {
        let (db, _dir) = setup_db().await;

        let first = create_order(&db, 42, PAYLOAD, "2026-08-04T10:00:00Z")
            .await
            .unwrap();
        let second = create_order(&db, 42, PAYLOAD, "2026-08-04T11:00:00Z")
            .await
            .unwrap();

        let latest = find_latest_pending_order(&db, 42).await.unwrap().unwrap();
        assert_eq!(latest.order_id, second);

        // Confirming the newest leaves the older one as latest pending.
        set_order_status(&db, second, OrderStatus::Confirmed)
            .await
            .unwrap();
        let latest = find_latest_pending_order(&db, 42).await.unwrap().unwrap();
        assert_eq!(latest.order_id, first);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn no_pending_order_returns_none() {
        let (db, _dir) = setup_db().await;

        let order_id = create_order(&db, 42, PAYLOAD, "2026-08-04T10:00:00Z")
            .await
            .unwrap();
        set_order_status(&db, order_id, OrderStatus::Superseded)
            .await
            .unwrap();

        assert!(find_latest_pending_order(&db, 42).await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn status_transitions_persist() {
        let (db, _dir) = setup_db().await;

        let order_id = create_order(&db, 42, PAYLOAD, "2026-08-04T10:00:00Z")
            .await
            .unwrap();
        set_order_status(&db, order_id, OrderStatus::Confirmed)
            .await
            .unwrap();

        let order = get_order(&db, order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);

        db.close().await.unwrap();
    }
}
