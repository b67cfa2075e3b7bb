#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Activity metrics, quadrant classification, rankings and rollups.
//!
//! Every function here is pure: callers fetch event rows or snapshots
//! from the results store and pass them in. Results are recomputed per
//! request and never written back.

pub mod activity;
pub mod quadrant;
pub mod ranking;
pub mod rollup;

use chrono::NaiveDate;
use thiserror::Error;

pub use activity::{aggregate, aggregate_by_region, aggregate_for_known, window_start};
pub use quadrant::{classify_quadrant, quadrant_stats};
pub use ranking::{top_clubs, top_n};
pub use rollup::{monthly_rollup, rollup_since, rollup_summary};

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A request parameter was out of range.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what went wrong.
        message: String,
    },

    /// A date could not be parsed or computed.
    #[error("Invalid date: {value}")]
    InvalidDate {
        /// The offending value.
        value: String,
    },
}

/// Parses `YYYY-MM-DD`, or `YYYY-MM` as the first of the month.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidDate`] for anything else.
pub fn parse_date(value: &str) -> Result<NaiveDate, AnalyticsError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
        .map_err(|_| AnalyticsError::InvalidDate {
            value: value.to_string(),
        })
}

/// Rounds to `places` decimal places, halves away from zero.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_and_month_dates() {
        assert_eq!(
            parse_date("2024-06-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
        assert_eq!(
            parse_date(" 2024-06 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(matches!(
            parse_date("June 2024"),
            Err(AnalyticsError::InvalidDate { .. })
        ));
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert!((round_to(2.345, 1) - 2.3).abs() < 1e-12);
        assert!((round_to(2.5, 0) - 3.0).abs() < f64::EPSILON);
        assert!((round_to(-2.5, 0) + 3.0).abs() < f64::EPSILON);
        assert!((round_to(10.0 / 3.0, 2) - 3.33).abs() < 1e-12);
    }
}
