//! Normalisation of caller-supplied timestamps.
//!
//! Window filters and recency ordering compare `created_at` as text, which
//! only works while every row uses the stored `YYYY-MM-DD HH:MM:SS` UTC form.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{DatabaseError, Result};

/// Format of every timestamp column (matches SQLite's `datetime('now')`).
pub const STORED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse an RFC 3339 or naive UTC timestamp into the stored format.
///
/// Offsets are converted to UTC; fractional seconds are dropped.
pub fn normalize_timestamp(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc).format(STORED_FORMAT).to_string());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|parsed| parsed.format(STORED_FORMAT).to_string())
        .ok_or_else(|| DatabaseError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

/// [`normalize_timestamp`] for optional columns.
pub(crate) fn normalize_optional(field: &'static str, value: Option<&str>) -> Result<Option<String>> {
    value.map(|v| normalize_timestamp(field, v)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_is_converted_to_utc() {
        assert_eq!(
            normalize_timestamp("created_at", "2026-10-19T10:00:00Z").unwrap(),
            "2026-10-19 10:00:00"
        );
        assert_eq!(
            normalize_timestamp("created_at", "2026-10-19T10:00:00.123456+02:00").unwrap(),
            "2026-10-19 08:00:00"
        );
    }

    #[test]
    fn test_naive_forms_are_kept_as_utc() {
        assert_eq!(
            normalize_timestamp("created_at", "2026-10-19 10:00:00").unwrap(),
            "2026-10-19 10:00:00"
        );
        assert_eq!(
            normalize_timestamp("created_at", " 2026-10-19T10:00:00.5 ").unwrap(),
            "2026-10-19 10:00:00"
        );
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = normalize_timestamp("created_at", "yesterday").unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::InvalidTimestamp { field: "created_at", ref value } if value == "yesterday"
        ));
        assert!(normalize_optional("created_at", None).unwrap().is_none());
    }
}
