//! Organized business profile persistence.
//!
//! Each user has at most one profile. Saving again replaces both the raw and
//! the organized text.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::BusinessInfo;

/// Save the raw and organized business description for a user.
pub async fn upsert_business_info(
    pool: &SqlitePool,
    clerk_user_id: &str,
    raw_info: &str,
    organized_info: &str,
) -> Result<BusinessInfo> {
    let stored = sqlx::query_as::<_, BusinessInfo>(
        r#"
        INSERT INTO business_info (clerk_user_id, raw_info, organized_info)
        VALUES (?, ?, ?)
        ON CONFLICT(clerk_user_id) DO UPDATE SET
            raw_info = excluded.raw_info,
            organized_info = excluded.organized_info,
            updated_at = datetime('now')
        RETURNING id, clerk_user_id, raw_info, organized_info, created_at, updated_at
        "#,
    )
    .bind(clerk_user_id)
    .bind(raw_info)
    .bind(organized_info)
    .fetch_one(pool)
    .await?;

    tracing::debug!(
        user_id = %clerk_user_id,
        raw_len = raw_info.len(),
        organized_len = organized_info.len(),
        "Saved business info"
    );

    Ok(stored)
}

/// Load the most recent business profile for a user.
pub async fn get_business_info(
    pool: &SqlitePool,
    clerk_user_id: &str,
) -> Result<Option<BusinessInfo>> {
    let info = sqlx::query_as::<_, BusinessInfo>(
        r#"
        SELECT id, clerk_user_id, raw_info, organized_info, created_at, updated_at
        FROM business_info
        WHERE clerk_user_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(clerk_user_id)
    .fetch_optional(pool)
    .await?;

    Ok(info)
}

/// Remove a user's business profile. Returns whether anything was deleted.
pub async fn delete_business_info(pool: &SqlitePool, clerk_user_id: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM business_info WHERE clerk_user_id = ?
        "#,
    )
    .bind(clerk_user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
