//! Database models.
//!
//! Timestamps are stored as UTC text in SQLite's `datetime('now')` format
//! (`YYYY-MM-DD HH:MM:SS`) so that range filters compare lexically. Writes
//! normalise caller-supplied values through [`crate::timestamp`].

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A signed-in user mirrored from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Identity-provider user id (external key).
    pub clerk_user_id: String,
    /// Primary email address.
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields written on every sign-in. Existing values are overwritten, not merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub clerk_user_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
}

/// Lifecycle of an inbound call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CallStatus {
    #[default]
    Pending,
    Booked,
    Scheduled,
    Completed,
    Cancelled,
}

/// Lifecycle of a booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    #[default]
    Pending,
    Completed,
    Cancelled,
}

/// A call handled by the voice agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Call {
    pub id: String,
    /// Owning user (identity-provider id).
    pub user_id: String,
    pub caller_name: String,
    pub caller_phone: String,
    pub service_type: String,
    pub status: CallStatus,
    /// Call length in seconds, when known.
    pub call_duration: Option<f64>,
    pub call_recording_url: Option<String>,
    pub notes: Option<String>,
    pub scheduled_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A call as written by the call-handling integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCall {
    pub id: String,
    pub user_id: String,
    pub caller_name: String,
    pub caller_phone: String,
    pub service_type: String,
    #[serde(default)]
    pub status: CallStatus,
    #[serde(default)]
    pub call_duration: Option<f64>,
    #[serde(default)]
    pub call_recording_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    /// Creation time; defaults to now on insert and is never changed by updates.
    /// RFC 3339 and naive UTC forms are accepted.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The subset of a call shown in the dashboard's recent-calls list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CallSummary {
    pub id: String,
    pub caller_name: String,
    pub service_type: String,
    pub status: CallStatus,
    pub scheduled_at: Option<String>,
    pub created_at: String,
}

/// A job booked from a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    /// Originating call.
    pub call_id: String,
    pub service_type: String,
    pub scheduled_at: String,
    /// Job length in minutes.
    pub duration: i64,
    pub price: f64,
    pub status: BookingStatus,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A booking as written by the call-handling integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub id: String,
    pub user_id: String,
    pub call_id: String,
    pub service_type: String,
    pub scheduled_at: String,
    pub duration: i64,
    pub price: f64,
    #[serde(default)]
    pub status: BookingStatus,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Raw and organized business description for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BusinessInfo {
    pub id: i64,
    pub clerk_user_id: String,
    pub raw_info: String,
    /// Markdown produced by the organizer.
    pub organized_info: String,
    pub created_at: String,
    pub updated_at: String,
}
