//! SQLite persistence layer for the Relay receptionist app.
//!
//! This crate provides async database operations for users, calls, bookings
//! and organized business profiles using SQLx with SQLite, plus a
//! [`ChangeFeed`] that announces every call/booking write.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, NewUser, user};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:relay.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let profile = NewUser {
//!         clerk_user_id: "user_2abc".to_string(),
//!         email: "owner@plumbing.example".to_string(),
//!         ..Default::default()
//!     };
//!     user::upsert_user(db.pool(), &profile).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod booking;
pub mod business_info;
pub mod call;
pub mod change_feed;
pub mod error;
pub mod models;
pub mod timestamp;
pub mod user;

pub use change_feed::{
    ChangeFeed, ChangeFilter, ChangeKind, ChangeSubscription, ChangeTable, RowChange,
};
pub use error::{DatabaseError, Result};
pub use timestamp::normalize_timestamp;
pub use models::{
    Booking, BookingStatus, BusinessInfo, Call, CallStatus, CallSummary, NewBooking, NewCall,
    NewUser, User,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    changes: ChangeFeed,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self {
            pool,
            changes: ChangeFeed::default(),
        })
    }

    /// Open a migrated in-memory database.
    ///
    /// Every pooled connection to `sqlite::memory:` is a separate database,
    /// so the pool is pinned to a single connection.
    pub async fn in_memory() -> Result<Self> {
        let db = Self::connect_with_pool_size("sqlite::memory:", 1).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the change feed for calls and bookings.
    pub fn changes(&self) -> &ChangeFeed {
        &self.changes
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// SQLite `datetime('now', ?)` modifier for a trailing window.
pub(crate) fn window_modifier(window: Duration) -> String {
    format!("-{} seconds", window.as_secs())
}
