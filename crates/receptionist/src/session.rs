//! Per-viewer dashboard lifecycle.
//!
//! A [`DashboardSession`] moves through `Uninitialized -> Loading -> Ready`.
//! Live changes are subscribed before the initial load so nothing written in
//! between is lost. While `Ready`, each change flips the `refreshing` flag on
//! until the recompute lands; the previous figures stay visible meanwhile.

use std::sync::Arc;

use database::DatabaseError;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::dashboard::{DashboardService, DashboardSnapshot, SnapshotObserver};

/// What a dashboard viewer currently sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Uninitialized,
    Loading,
    Ready {
        #[serde(flatten)]
        snapshot: DashboardSnapshot,
        refreshing: bool,
    },
}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match self {
            Self::Ready { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }
}

/// Forwards recompute results into the session's watch channel.
struct SessionObserver {
    tx: Arc<watch::Sender<SessionState>>,
}

impl SnapshotObserver for SessionObserver {
    fn refresh_started(&self) {
        self.tx.send_if_modified(|state| match state {
            SessionState::Ready { refreshing, .. } if !*refreshing => {
                *refreshing = true;
                true
            }
            _ => false,
        });
    }

    fn refreshed(&self, snapshot: DashboardSnapshot) {
        self.tx.send_replace(SessionState::Ready {
            snapshot,
            refreshing: false,
        });
    }

    fn refresh_failed(&self, _error: &DatabaseError) {
        self.tx.send_if_modified(|state| match state {
            SessionState::Ready { refreshing, .. } if *refreshing => {
                *refreshing = false;
                true
            }
            _ => false,
        });
    }
}

/// A live dashboard for one viewer. Dropping it releases the subscription.
#[derive(Debug)]
pub struct DashboardSession {
    user_id: String,
    tx: Arc<watch::Sender<SessionState>>,
    driver: Option<JoinHandle<()>>,
}

impl DashboardSession {
    /// Subscribe to `user_id`'s changes and start the initial load.
    pub fn start(service: DashboardService, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let tx = Arc::new(watch::Sender::new(SessionState::Uninitialized));

        let driver = tokio::spawn(drive(service, user_id.clone(), tx.clone()));

        Self {
            user_id,
            tx,
            driver: Some(driver),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every state transition.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Stop the session and wait for its subscription to be released.
    pub async fn close(mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
            let _ = driver.await;
        }
    }
}

impl Drop for DashboardSession {
    fn drop(&mut self) {
        if let Some(driver) = &self.driver {
            driver.abort();
        }
    }
}

async fn drive(service: DashboardService, user_id: String, tx: Arc<watch::Sender<SessionState>>) {
    tx.send_replace(SessionState::Loading);

    let _subscription = service.subscribe(&user_id, SessionObserver { tx: tx.clone() });

    match service.snapshot(&user_id).await {
        Ok(snapshot) => {
            // A live refresh may already have produced a newer snapshot.
            tx.send_if_modified(|state| {
                if matches!(state, SessionState::Loading) {
                    *state = SessionState::Ready {
                        snapshot,
                        refreshing: false,
                    };
                    true
                } else {
                    false
                }
            });
            info!(user_id = %user_id, "Dashboard session ready");
        }
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Initial dashboard load failed");
        }
    }

    // Runs until the session aborts it, which drops the subscription.
    std::future::pending::<()>().await;
}
