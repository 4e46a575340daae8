//! Date and timestamp generators.
//!
//! Values are drawn from a fixed window rather than the wall clock so that
//! a seeded run always produces the same output.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;

/// Inclusive window (unix seconds) dates are drawn from: 2015-01-01 to 2025-12-31.
const WINDOW_START: i64 = 1_420_070_400;
const WINDOW_END: i64 = 1_767_225_599;

fn random_instant<R: Rng>(rng: &mut R) -> DateTime<Utc> {
    let ts = rng.random_range(WINDOW_START..=WINDOW_END);
    DateTime::from_timestamp(ts, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Random calendar date formatted as `YYYY-MM-DD`.
pub fn generate_date<R: Rng>(rng: &mut R) -> String {
    random_instant(rng).format("%Y-%m-%d").to_string()
}

/// Random RFC 3339 timestamp in UTC with second precision.
pub fn generate_date_time<R: Rng>(rng: &mut R) -> String {
    random_instant(rng).to_rfc3339_opts(SecondsFormat::Secs, true)
}
