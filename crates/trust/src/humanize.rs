//! Human readable relative times ("5 minutes ago", "in 2 days").

use chrono::{DateTime, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Days per month averaged over the 400 year Gregorian cycle.
const DAYS_PER_MONTH: f64 = 146_097.0 / 4_800.0;

// Thresholds below which a unit is used.
const FEW_SECONDS_MAX: f64 = 44.0;
const MINUTES_LIMIT: f64 = 45.0;
const HOURS_LIMIT: f64 = 22.0;
const DAYS_LIMIT: f64 = 26.0;
const MONTHS_LIMIT: f64 = 11.0;

/// Describe `then` relative to `now`.
///
/// Instants in the past read "... ago", instants in the future "in ...".
/// Identical instants count as past.
#[must_use]
pub fn from_now(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (then - now).num_milliseconds();
    let phrase = describe(diff_ms.unsigned_abs());

    if diff_ms > 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn describe(abs_ms: u64) -> String {
    let ms = abs_ms as f64;
    let seconds = (ms / 1_000.0).round();
    let minutes = (ms / 60_000.0).round();
    let hours = (ms / 3_600_000.0).round();
    let days_exact = ms / MS_PER_DAY;
    let days = days_exact.round();
    let months = (days_exact / DAYS_PER_MONTH).round();
    let years = (days_exact / DAYS_PER_MONTH / 12.0).round();

    let count = |n: f64, unit: &str| format!("{} {unit}", n as u64);

    if seconds <= FEW_SECONDS_MAX {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < MINUTES_LIMIT {
        count(minutes, "minutes")
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < HOURS_LIMIT {
        count(hours, "hours")
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < DAYS_LIMIT {
        count(days, "days")
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < MONTHS_LIMIT {
        count(months, "months")
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        count(years, "years")
    }
}
