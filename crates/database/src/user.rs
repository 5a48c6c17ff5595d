//! User persistence.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{NewUser, User};

/// Create or overwrite a user keyed by identity-provider id.
///
/// Every field is replaced, including with `NULL`, so a repeated sign-in
/// always leaves the row equal to the latest profile.
pub async fn upsert_user(pool: &SqlitePool, user: &NewUser) -> Result<User> {
    let stored = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (clerk_user_id, email, first_name, last_name, phone, business_name)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(clerk_user_id) DO UPDATE SET
            email = excluded.email,
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            phone = excluded.phone,
            business_name = excluded.business_name,
            updated_at = datetime('now')
        RETURNING clerk_user_id, email, first_name, last_name, phone, business_name,
                  created_at, updated_at
        "#,
    )
    .bind(&user.clerk_user_id)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone)
    .bind(&user.business_name)
    .fetch_one(pool)
    .await?;

    Ok(stored)
}

/// Get a user by identity-provider id.
pub async fn get_user(pool: &SqlitePool, clerk_user_id: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT clerk_user_id, email, first_name, last_name, phone, business_name,
               created_at, updated_at
        FROM users
        WHERE clerk_user_id = ?
        "#,
    )
    .bind(clerk_user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
