//! Domain services for the Relay receptionist app.
//!
//! - [`DashboardService`] derives the dashboard figures from calls and
//!   bookings and keeps them current through the change feed;
//!   [`DashboardSession`] wraps one viewer's lifecycle.
//! - [`BusinessInfoOrganizer`] turns free text into a Markdown profile and
//!   stores it.
//! - [`ContactService`] validates and emails contact-form submissions.
//! - [`ChatAssistant`] answers the sales chat widget.
//! - [`sync_user`] mirrors identity-provider profiles into `users`.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use database::Database;
//! use mock_llm::CannedModel;
//! use receptionist::{BusinessInfoOrganizer, OrganizeOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::in_memory().await?;
//!     let organizer = BusinessInfoOrganizer::new(Arc::new(CannedModel::new("## Overview")), db);
//!
//!     if let OrganizeOutcome::Organized(result) = organizer
//!         .organize_and_persist(Some("user_2abc"), "We fix AC units in Austin")
//!         .await?
//!     {
//!         println!("{}", result.markdown);
//!     }
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod contact;
pub mod dashboard;
pub mod error;
pub mod identity;
pub mod organizer;
pub mod session;

pub use chat::ChatAssistant;
pub use contact::{ContactMeta, ContactRequest, ContactService};
pub use dashboard::{
    DashboardService, DashboardSnapshot, DashboardStats, DashboardSubscription, SnapshotObserver,
    DEFAULT_RECENT_CALLS, MAX_RECENT_CALLS,
};
pub use error::{ContactError, IdentityError, OrganizeError};
pub use identity::{sync_user, ClerkClient, ClerkConfig, IdentityProvider};
pub use organizer::{BusinessInfoOrganizer, OrganizeOutcome, Organized, OrganizedKind};
pub use session::{DashboardSession, SessionState};
