//! Booking persistence and revenue queries.

use std::time::Duration;

use sqlx::SqlitePool;

use crate::change_feed::{ChangeKind, ChangeTable, RowChange};
use crate::error::{DatabaseError, Result};
use crate::models::{Booking, NewBooking};
use crate::timestamp::normalize_optional;
use crate::{window_modifier, Database};

/// Insert or update a booking and announce the change.
pub async fn upsert_booking(db: &Database, booking: &NewBooking) -> Result<ChangeKind> {
    let created_at = normalize_optional("created_at", booking.created_at.as_deref())?;

    let mut tx = db.pool().begin().await?;

    let previous_owner = sqlx::query_scalar::<_, String>(
        r#"
        SELECT user_id FROM bookings WHERE id = ?
        "#,
    )
    .bind(&booking.id)
    .fetch_optional(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO bookings (
            id, user_id, call_id, service_type, scheduled_at, duration, price,
            status, customer_name, customer_phone, customer_email, notes, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, COALESCE(?, datetime('now')))
        ON CONFLICT(id) DO UPDATE SET
            user_id = excluded.user_id,
            call_id = excluded.call_id,
            service_type = excluded.service_type,
            scheduled_at = excluded.scheduled_at,
            duration = excluded.duration,
            price = excluded.price,
            status = excluded.status,
            customer_name = excluded.customer_name,
            customer_phone = excluded.customer_phone,
            customer_email = excluded.customer_email,
            notes = excluded.notes,
            updated_at = datetime('now')
        "#,
    )
    .bind(&booking.id)
    .bind(&booking.user_id)
    .bind(&booking.call_id)
    .bind(&booking.service_type)
    .bind(&booking.scheduled_at)
    .bind(booking.duration)
    .bind(booking.price)
    .bind(booking.status)
    .bind(&booking.customer_name)
    .bind(&booking.customer_phone)
    .bind(&booking.customer_email)
    .bind(&booking.notes)
    .bind(&created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let kind = match previous_owner {
        Some(ref owner) if owner != &booking.user_id => {
            db.changes().publish(RowChange::new(
                ChangeTable::Bookings,
                ChangeKind::Update,
                owner.as_str(),
                &booking.id,
            ));
            ChangeKind::Update
        }
        Some(_) => ChangeKind::Update,
        None => ChangeKind::Insert,
    };

    db.changes().publish(RowChange::new(
        ChangeTable::Bookings,
        kind,
        &booking.user_id,
        &booking.id,
    ));

    Ok(kind)
}

/// Delete a booking and announce the change.
pub async fn delete_booking(db: &Database, id: &str) -> Result<()> {
    let owner = sqlx::query_scalar::<_, String>(
        r#"
        DELETE FROM bookings
        WHERE id = ?
        RETURNING user_id
        "#,
    )
    .bind(id)
    .fetch_optional(db.pool())
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Booking",
        id: id.to_string(),
    })?;

    db.changes().publish(RowChange::new(
        ChangeTable::Bookings,
        ChangeKind::Delete,
        owner,
        id,
    ));

    Ok(())
}

/// Get a booking by id.
pub async fn get_booking(pool: &SqlitePool, id: &str) -> Result<Booking> {
    sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, user_id, call_id, service_type, scheduled_at, duration, price,
               status, customer_name, customer_phone, customer_email, notes,
               created_at, updated_at
        FROM bookings
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Booking",
        id: id.to_string(),
    })
}

/// Count a user's bookings created within the trailing window, any status.
pub async fn count_bookings_since(
    pool: &SqlitePool,
    user_id: &str,
    window: Duration,
) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM bookings
        WHERE user_id = ? AND created_at >= datetime('now', ?)
        "#,
    )
    .bind(user_id)
    .bind(window_modifier(window))
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Sum of prices of confirmed bookings created within the trailing window.
pub async fn confirmed_revenue_since(
    pool: &SqlitePool,
    user_id: &str,
    window: Duration,
) -> Result<f64> {
    let revenue = sqlx::query_scalar::<_, f64>(
        r#"
        SELECT COALESCE(SUM(price), 0.0) FROM bookings
        WHERE user_id = ?
          AND status = 'confirmed'
          AND created_at >= datetime('now', ?)
        "#,
    )
    .bind(user_id)
    .bind(window_modifier(window))
    .fetch_one(pool)
    .await?;

    Ok(revenue)
}
