//! Dashboard aggregation and live refresh.
//!
//! Figures are never stored: every read recomputes them from `calls` and
//! `bookings` over a trailing 30-day window. A subscription treats each row
//! change as a cue to recompute the whole snapshot, never as a delta.

use std::sync::Arc;
use std::time::Duration;

use database::{
    booking, call, CallSummary, ChangeFilter, ChangeSubscription, Database, DatabaseError,
};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Trailing window the dashboard figures cover.
pub const STATS_WINDOW: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Default length of the recent-calls list.
pub const DEFAULT_RECENT_CALLS: u32 = 10;

/// Upper bound accepted for the recent-calls list.
pub const MAX_RECENT_CALLS: u32 = 50;

/// Aggregate figures for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Calls created in the window.
    pub calls_handled: i64,
    /// Bookings created in the window, any status.
    pub jobs_booked: i64,
    /// Mean call duration in seconds, one decimal; 0 when no call has one.
    pub avg_response_time: f64,
    /// Sum of confirmed booking prices, two decimals.
    pub revenue: f64,
}

/// Everything the dashboard displays.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub recent_calls: Vec<CallSummary>,
}

/// Receives recompute results from a [`DashboardSubscription`].
///
/// Plain closures taking a [`DashboardSnapshot`] implement this trait.
pub trait SnapshotObserver: Send + Sync + 'static {
    /// A change arrived and a recompute is starting.
    fn refresh_started(&self) {}

    /// A recompute finished.
    fn refreshed(&self, snapshot: DashboardSnapshot);

    /// A recompute failed; the previous values stay current.
    fn refresh_failed(&self, _error: &DatabaseError) {}
}

impl<F> SnapshotObserver for F
where
    F: Fn(DashboardSnapshot) + Send + Sync + 'static,
{
    fn refreshed(&self, snapshot: DashboardSnapshot) {
        self(snapshot)
    }
}

/// Reads dashboard figures for a user.
#[derive(Debug, Clone)]
pub struct DashboardService {
    db: Database,
}

impl DashboardService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Aggregate figures over the trailing window.
    pub async fn compute_stats(&self, user_id: &str) -> Result<DashboardStats, DatabaseError> {
        let pool = self.db.pool();

        let calls_handled = call::count_calls_since(pool, user_id, STATS_WINDOW).await?;
        let jobs_booked = booking::count_bookings_since(pool, user_id, STATS_WINDOW).await?;
        let avg_duration = call::average_duration_since(pool, user_id, STATS_WINDOW)
            .await?
            .unwrap_or(0.0);
        let revenue = booking::confirmed_revenue_since(pool, user_id, STATS_WINDOW).await?;

        Ok(DashboardStats {
            calls_handled,
            jobs_booked,
            avg_response_time: round_to(avg_duration, 1),
            revenue: round_to(revenue, 2),
        })
    }

    /// Most recent calls, newest first. Limits above [`MAX_RECENT_CALLS`]
    /// are clamped.
    pub async fn fetch_recent_calls(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<CallSummary>, DatabaseError> {
        call::recent_calls(self.db.pool(), user_id, limit.min(MAX_RECENT_CALLS)).await
    }

    /// Stats plus the default-length recent-calls list.
    pub async fn snapshot(&self, user_id: &str) -> Result<DashboardSnapshot, DatabaseError> {
        let stats = self.compute_stats(user_id).await?;
        let recent_calls = self.fetch_recent_calls(user_id, DEFAULT_RECENT_CALLS).await?;
        Ok(DashboardSnapshot {
            stats,
            recent_calls,
        })
    }

    /// Recompute the snapshot whenever a call or booking of `user_id` changes.
    ///
    /// Opens one stream per table. Both are registered before this returns,
    /// so no change made after the call is missed. Must be called from within
    /// a Tokio runtime.
    pub fn subscribe<O: SnapshotObserver>(
        &self,
        user_id: &str,
        observer: O,
    ) -> DashboardSubscription {
        let observer: Arc<dyn SnapshotObserver> = Arc::new(observer);
        let changes = self.db.changes();

        let calls = changes.subscribe(ChangeFilter::calls(user_id));
        let bookings = changes.subscribe(ChangeFilter::bookings(user_id));

        info!(user_id = %user_id, "Opened dashboard subscription");

        let tasks = vec![
            tokio::spawn(self.clone().refresh_on_change(calls, observer.clone())),
            tokio::spawn(self.clone().refresh_on_change(bookings, observer)),
        ];

        DashboardSubscription { tasks }
    }

    async fn refresh_on_change(
        self,
        mut changes: ChangeSubscription,
        observer: Arc<dyn SnapshotObserver>,
    ) {
        let user_id = changes.filter().user_id.clone();

        while let Some(change) = changes.recv().await {
            debug!(
                user_id = %user_id,
                table = ?change.table,
                kind = ?change.kind,
                "Dashboard change received, recomputing"
            );

            observer.refresh_started();
            match self.snapshot(&user_id).await {
                Ok(snapshot) => observer.refreshed(snapshot),
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Dashboard recompute failed");
                    observer.refresh_failed(&e);
                }
            }
        }

        debug!(user_id = %user_id, table = ?changes.filter().table, "Change stream closed");
    }
}

/// Handle for a live dashboard subscription. Dropping it cancels both streams.
#[derive(Debug)]
pub struct DashboardSubscription {
    tasks: Vec<JoinHandle<()>>,
}

impl DashboardSubscription {
    /// End both streams and wait until they have unsubscribed.
    pub async fn cancel(mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
            let _ = task.await;
        }
    }

    /// Whether both streams are still running.
    pub fn is_active(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|task| !task.is_finished())
    }
}

impl Drop for DashboardSubscription {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Round half away from zero to a fixed number of decimals.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
