// SPDX-FileCopyrightText: 2026 Brewline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User CRUD operations.

use brewline_core::BrewlineError;
use rusqlite::params;

use crate::database::Database;
use crate::models::User;

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get(0)?,
        display_name: row.get(1)?,
        username: row.get(2)?,
        organization: row.get(3)?,
        phone: row.get(4)?,
        approved: row.get(5)?,
        registered_at: row.get(6)?,
    })
}

/// Get a user by id.
pub async fn get_user(db: &Database, user_id: i64) -> Result<Option<User>, BrewlineError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, display_name, username, organization, phone, approved, registered_at
                 FROM users WHERE user_id = ?1",
            )?;
            let result = stmt.query_row(params![user_id], row_to_user);
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or update a user.
pub async fn save_user(db: &Database, user: &User) -> Result<(), BrewlineError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (user_id, display_name, username, organization, phone, approved, registered_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(user_id) DO UPDATE SET
                     display_name = excluded.display_name,
                     username = excluded.username,
                     organization = excluded.organization,
                     phone = excluded.phone,
                     approved = excluded.approved",
                params![
                    user.user_id,
                    user.display_name,
                    user.username,
                    user.organization,
                    user.phone,
                    user.approved,
                    user.registered_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip a user's approval flag.
pub async fn set_approval(
    db: &Database,
    user_id: i64,
    approved: bool,
) -> Result<(), BrewlineError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE users SET approved = ?1 WHERE user_id = ?2",
                params![approved, user_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
