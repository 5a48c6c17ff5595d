//! Call persistence and the aggregate queries behind the dashboard.

use std::time::Duration;

use sqlx::SqlitePool;

use crate::change_feed::{ChangeKind, ChangeTable, RowChange};
use crate::error::{DatabaseError, Result};
use crate::models::{Call, CallSummary, NewCall};
use crate::timestamp::normalize_optional;
use crate::{window_modifier, Database};

/// Insert or update a call and announce the change.
///
/// The creation timestamp of an existing call is never modified. If the
/// call moved to another user, that user is notified as well.
pub async fn upsert_call(db: &Database, call: &NewCall) -> Result<ChangeKind> {
    let created_at = normalize_optional("created_at", call.created_at.as_deref())?;

    let mut tx = db.pool().begin().await?;

    let previous_owner = sqlx::query_scalar::<_, String>(
        r#"
        SELECT user_id FROM calls WHERE id = ?
        "#,
    )
    .bind(&call.id)
    .fetch_optional(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO calls (
            id, user_id, caller_name, caller_phone, service_type, status,
            call_duration, call_recording_url, notes, scheduled_at, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, COALESCE(?, datetime('now')))
        ON CONFLICT(id) DO UPDATE SET
            user_id = excluded.user_id,
            caller_name = excluded.caller_name,
            caller_phone = excluded.caller_phone,
            service_type = excluded.service_type,
            status = excluded.status,
            call_duration = excluded.call_duration,
            call_recording_url = excluded.call_recording_url,
            notes = excluded.notes,
            scheduled_at = excluded.scheduled_at,
            updated_at = datetime('now')
        "#,
    )
    .bind(&call.id)
    .bind(&call.user_id)
    .bind(&call.caller_name)
    .bind(&call.caller_phone)
    .bind(&call.service_type)
    .bind(call.status)
    .bind(call.call_duration)
    .bind(&call.call_recording_url)
    .bind(&call.notes)
    .bind(&call.scheduled_at)
    .bind(&created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let kind = if previous_owner.is_some() {
        ChangeKind::Update
    } else {
        ChangeKind::Insert
    };

    if let Some(owner) = previous_owner.filter(|owner| owner != &call.user_id) {
        db.changes()
            .publish(RowChange::new(ChangeTable::Calls, ChangeKind::Update, owner, &call.id));
    }
    db.changes()
        .publish(RowChange::new(ChangeTable::Calls, kind, &call.user_id, &call.id));

    Ok(kind)
}

/// Delete a call and announce the change.
pub async fn delete_call(db: &Database, id: &str) -> Result<()> {
    let owner = sqlx::query_scalar::<_, String>(
        r#"
        DELETE FROM calls
        WHERE id = ?
        RETURNING user_id
        "#,
    )
    .bind(id)
    .fetch_optional(db.pool())
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Call",
        id: id.to_string(),
    })?;

    db.changes()
        .publish(RowChange::new(ChangeTable::Calls, ChangeKind::Delete, owner, id));

    Ok(())
}

/// Get a call by id.
pub async fn get_call(pool: &SqlitePool, id: &str) -> Result<Call> {
    sqlx::query_as::<_, Call>(
        r#"
        SELECT id, user_id, caller_name, caller_phone, service_type, status,
               call_duration, call_recording_url, notes, scheduled_at,
               created_at, updated_at
        FROM calls
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Call",
        id: id.to_string(),
    })
}

/// Count a user's calls created within the trailing window.
pub async fn count_calls_since(pool: &SqlitePool, user_id: &str, window: Duration) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM calls
        WHERE user_id = ? AND created_at >= datetime('now', ?)
        "#,
    )
    .bind(user_id)
    .bind(window_modifier(window))
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Mean duration of a user's calls within the trailing window.
///
/// Calls without a duration are ignored. Returns `None` when no call in the
/// window has one.
pub async fn average_duration_since(
    pool: &SqlitePool,
    user_id: &str,
    window: Duration,
) -> Result<Option<f64>> {
    let average = sqlx::query_scalar::<_, Option<f64>>(
        r#"
        SELECT AVG(call_duration) FROM calls
        WHERE user_id = ?
          AND created_at >= datetime('now', ?)
          AND call_duration IS NOT NULL
        "#,
    )
    .bind(user_id)
    .bind(window_modifier(window))
    .fetch_one(pool)
    .await?;

    Ok(average)
}

/// A user's most recent calls, newest first.
///
/// Calls created in the same second keep insertion order (latest first).
pub async fn recent_calls(pool: &SqlitePool, user_id: &str, limit: u32) -> Result<Vec<CallSummary>> {
    let calls = sqlx::query_as::<_, CallSummary>(
        r#"
        SELECT id, caller_name, service_type, status, scheduled_at, created_at
        FROM calls
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    Ok(calls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change_feed::ChangeFilter;
    use crate::models::CallStatus;
    use crate::test_support::{days_ago, minutes_ago, minutes_ago_rfc3339};

    const THIRTY_DAYS: Duration = Duration::from_secs(30 * 24 * 60 * 60);

    fn call(id: &str, user_id: &str) -> NewCall {
        NewCall {
            id: id.to_string(),
            user_id: user_id.to_string(),
            caller_name: "Pat Caller".to_string(),
            caller_phone: "+15550001111".to_string(),
            service_type: "Water heater repair".to_string(),
            status: CallStatus::Pending,
            call_duration: None,
            call_recording_url: None,
            notes: None,
            scheduled_at: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_call_insert_then_update() {
        let db = Database::in_memory().await.unwrap();
        let mut sub = db.changes().subscribe(ChangeFilter::calls("user_1"));

        let mut new_call = call("call_1", "user_1");
        new_call.created_at = Some(days_ago(2));
        assert_eq!(upsert_call(&db, &new_call).await.unwrap(), ChangeKind::Insert);

        new_call.status = CallStatus::Booked;
        new_call.created_at = None;
        assert_eq!(upsert_call(&db, &new_call).await.unwrap(), ChangeKind::Update);

        let stored = get_call(db.pool(), "call_1").await.unwrap();
        assert_eq!(stored.status, CallStatus::Booked);
        // Creation day survives the update.
        assert!(stored.created_at.starts_with(&days_ago(2)[..10]));

        assert_eq!(sub.recv().await.unwrap().kind, ChangeKind::Insert);
        assert_eq!(sub.recv().await.unwrap().kind, ChangeKind::Update);
    }

    #[tokio::test]
    async fn test_reassigned_call_notifies_both_owners() {
        let db = Database::in_memory().await.unwrap();
        upsert_call(&db, &call("call_1", "user_1")).await.unwrap();

        let mut old_owner = db.changes().subscribe(ChangeFilter::calls("user_1"));
        let mut new_owner = db.changes().subscribe(ChangeFilter::calls("user_2"));

        upsert_call(&db, &call("call_1", "user_2")).await.unwrap();

        assert_eq!(old_owner.recv().await.unwrap().row_id, "call_1");
        assert_eq!(new_owner.recv().await.unwrap().row_id, "call_1");
    }

    #[tokio::test]
    async fn test_delete_call() {
        let db = Database::in_memory().await.unwrap();
        upsert_call(&db, &call("call_1", "user_1")).await.unwrap();
        let mut sub = db.changes().subscribe(ChangeFilter::calls("user_1"));

        delete_call(&db, "call_1").await.unwrap();
        assert_eq!(sub.recv().await.unwrap().kind, ChangeKind::Delete);

        let result = delete_call(&db, "call_1").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_window_counts_and_average() {
        let db = Database::in_memory().await.unwrap();

        let mut recent = call("c1", "user_1");
        recent.call_duration = Some(120.0);
        upsert_call(&db, &recent).await.unwrap();

        let mut recent_no_duration = call("c2", "user_1");
        recent_no_duration.created_at = Some(days_ago(5));
        upsert_call(&db, &recent_no_duration).await.unwrap();

        let mut recent_short = call("c3", "user_1");
        recent_short.call_duration = Some(45.0);
        recent_short.created_at = Some(days_ago(29));
        upsert_call(&db, &recent_short).await.unwrap();

        let mut old = call("c4", "user_1");
        old.call_duration = Some(999.0);
        old.created_at = Some(days_ago(31));
        upsert_call(&db, &old).await.unwrap();

        let mut other_user = call("c5", "user_2");
        other_user.call_duration = Some(10.0);
        upsert_call(&db, &other_user).await.unwrap();

        let count = count_calls_since(db.pool(), "user_1", THIRTY_DAYS).await.unwrap();
        assert_eq!(count, 3);

        let average = average_duration_since(db.pool(), "user_1", THIRTY_DAYS)
            .await
            .unwrap();
        assert_eq!(average, Some(82.5));
    }

    #[tokio::test]
    async fn test_average_none_without_durations() {
        let db = Database::in_memory().await.unwrap();
        upsert_call(&db, &call("c1", "user_1")).await.unwrap();

        let average = average_duration_since(db.pool(), "user_1", THIRTY_DAYS)
            .await
            .unwrap();
        assert!(average.is_none());
    }

    #[tokio::test]
    async fn test_recent_calls_ordering_and_limit() {
        let db = Database::in_memory().await.unwrap();

        for i in 0..12 {
            let mut c = call(&format!("c{:02}", i), "user_1");
            c.created_at = Some(minutes_ago(100 - i));
            upsert_call(&db, &c).await.unwrap();
        }

        let calls = recent_calls(db.pool(), "user_1", 10).await.unwrap();
        assert_eq!(calls.len(), 10);
        assert_eq!(calls[0].id, "c11");
        assert_eq!(calls[9].id, "c02");
        assert!(calls.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_mixed_timestamp_formats_share_one_timeline() {
        let db = Database::in_memory().await.unwrap();

        let mut older_iso = call("older_iso", "user_1");
        older_iso.created_at = Some(minutes_ago_rfc3339(120));
        upsert_call(&db, &older_iso).await.unwrap();

        let mut newer_plain = call("newer_plain", "user_1");
        newer_plain.created_at = Some(minutes_ago(60));
        upsert_call(&db, &newer_plain).await.unwrap();

        let mut outside_window = call("outside_window", "user_1");
        outside_window.created_at = Some(minutes_ago_rfc3339(30 * 24 * 60 + 5));
        upsert_call(&db, &outside_window).await.unwrap();

        let ids: Vec<String> = recent_calls(db.pool(), "user_1", 10)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["newer_plain", "older_iso", "outside_window"]);

        let count = count_calls_since(db.pool(), "user_1", THIRTY_DAYS).await.unwrap();
        assert_eq!(count, 2);

        let stored = get_call(db.pool(), "older_iso").await.unwrap();
        assert!(!stored.created_at.contains('T'));
    }

    #[tokio::test]
    async fn test_unparseable_created_at_is_rejected() {
        let db = Database::in_memory().await.unwrap();
        let mut sub = db.changes().subscribe(ChangeFilter::calls("user_1"));

        let mut bad = call("c1", "user_1");
        bad.created_at = Some("last tuesday".to_string());

        let result = upsert_call(&db, &bad).await;
        assert!(matches!(result, Err(DatabaseError::InvalidTimestamp { .. })));
        assert!(get_call(db.pool(), "c1").await.is_err());
        let nothing_published = tokio::time::timeout(Duration::from_millis(50), sub.recv())
            .await
            .is_err();
        assert!(nothing_published);
    }

    #[tokio::test]
    async fn test_recent_calls_empty() {
        let db = Database::in_memory().await.unwrap();
        let calls = recent_calls(db.pool(), "user_1", 10).await.unwrap();
        assert!(calls.is_empty());
    }
}
