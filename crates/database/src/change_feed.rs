//! Row-level change notifications for calls and bookings.
//!
//! Every write made through [`crate::call`] or [`crate::booking`] publishes a
//! [`RowChange`] on a broadcast channel. Subscribers filter by table and
//! owning user. A change carries only identifiers: consumers are expected to
//! refetch whatever state they display rather than apply the change as a
//! delta.

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// Tables that publish changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeTable {
    Calls,
    Bookings,
}

/// What happened to the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    /// The subscriber fell behind and some changes were dropped.
    Resync,
}

/// A single change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowChange {
    pub table: ChangeTable,
    pub kind: ChangeKind,
    /// Owning user of the changed row.
    pub user_id: String,
    /// Primary key of the changed row (empty for [`ChangeKind::Resync`]).
    pub row_id: String,
}

impl RowChange {
    /// Create a change notification.
    pub fn new(
        table: ChangeTable,
        kind: ChangeKind,
        user_id: impl Into<String>,
        row_id: impl Into<String>,
    ) -> Self {
        Self {
            table,
            kind,
            user_id: user_id.into(),
            row_id: row_id.into(),
        }
    }
}

/// Equality filter applied to a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    pub table: ChangeTable,
    pub user_id: String,
}

impl ChangeFilter {
    /// Changes to `calls` owned by `user_id`.
    pub fn calls(user_id: impl Into<String>) -> Self {
        Self {
            table: ChangeTable::Calls,
            user_id: user_id.into(),
        }
    }

    /// Changes to `bookings` owned by `user_id`.
    pub fn bookings(user_id: impl Into<String>) -> Self {
        Self {
            table: ChangeTable::Bookings,
            user_id: user_id.into(),
        }
    }

    /// Whether a change passes this filter.
    pub fn matches(&self, change: &RowChange) -> bool {
        change.table == self.table && change.user_id == self.user_id
    }
}

/// Broadcast hub for row changes.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<RowChange>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl ChangeFeed {
    /// Buffered notifications per subscriber before it is considered lagging.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a feed with the given per-subscriber buffer.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish a change to every current subscriber.
    pub fn publish(&self, change: RowChange) {
        debug!(
            table = ?change.table,
            kind = ?change.kind,
            user_id = %change.user_id,
            row_id = %change.row_id,
            "Publishing row change"
        );
        // An error only means nobody is listening.
        let _ = self.sender.send(change);
    }

    /// Open a filtered subscription.
    pub fn subscribe(&self, filter: ChangeFilter) -> ChangeSubscription {
        ChangeSubscription {
            receiver: self.sender.subscribe(),
            filter,
        }
    }

    /// Number of open subscriptions (filtered or not).
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// A filtered stream of changes. Dropping it unsubscribes.
#[derive(Debug)]
pub struct ChangeSubscription {
    receiver: broadcast::Receiver<RowChange>,
    filter: ChangeFilter,
}

impl ChangeSubscription {
    /// Wait for the next matching change.
    ///
    /// When the subscriber has lagged behind the channel a synthetic
    /// [`ChangeKind::Resync`] change is returned in place of the dropped
    /// notifications. Returns `None` once the feed is gone.
    pub async fn recv(&mut self) -> Option<RowChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) if self.filter.matches(&change) => return Some(change),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(
                        table = ?self.filter.table,
                        user_id = %self.filter.user_id,
                        skipped,
                        "Change subscriber lagged, requesting resync"
                    );
                    return Some(RowChange::new(
                        self.filter.table,
                        ChangeKind::Resync,
                        self.filter.user_id.clone(),
                        String::new(),
                    ));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// The filter this subscription was opened with.
    pub fn filter(&self) -> &ChangeFilter {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscription_filters_by_table_and_user() {
        let feed = ChangeFeed::default();
        let mut sub = feed.subscribe(ChangeFilter::calls("user_a"));

        feed.publish(RowChange::new(ChangeTable::Bookings, ChangeKind::Insert, "user_a", "b1"));
        feed.publish(RowChange::new(ChangeTable::Calls, ChangeKind::Insert, "user_b", "c1"));
        feed.publish(RowChange::new(ChangeTable::Calls, ChangeKind::Update, "user_a", "c2"));

        let change = sub.recv().await.unwrap();
        assert_eq!(change.row_id, "c2");
        assert_eq!(change.kind, ChangeKind::Update);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_gets_resync() {
        let feed = ChangeFeed::new(2);
        let mut sub = feed.subscribe(ChangeFilter::bookings("user_a"));

        for i in 0..5 {
            feed.publish(RowChange::new(
                ChangeTable::Bookings,
                ChangeKind::Insert,
                "user_a",
                format!("b{}", i),
            ));
        }

        let change = sub.recv().await.unwrap();
        assert_eq!(change.kind, ChangeKind::Resync);
        assert_eq!(change.table, ChangeTable::Bookings);
        assert_eq!(change.user_id, "user_a");
    }

    #[tokio::test]
    async fn test_recv_returns_none_when_feed_dropped() {
        let feed = ChangeFeed::default();
        let mut sub = feed.subscribe(ChangeFilter::calls("user_a"));
        drop(feed);

        assert!(sub.recv().await.is_none());
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let feed = ChangeFeed::default();
        let sub = feed.subscribe(ChangeFilter::calls("user_a"));
        assert_eq!(feed.subscriber_count(), 1);
        drop(sub);
        assert_eq!(feed.subscriber_count(), 0);
    }
}
