//! Numeric helpers shared by the analyzer and the optimizer.
//!
//! Every ratio here returns 0 for a zero (or non-finite) denominator rather
//! than NaN or infinity, since results are displayed directly to operators.

use chrono::{DateTime, Duration, Utc};

/// Milliseconds in one day. All day conversions go through this constant.
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// `numerator / denominator`, or 0 when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        let r = numerator / denominator;
        if r.is_finite() {
            r
        } else {
            0.0
        }
    }
}

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation, 0 for an empty slice.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation (`stddev / mean`).
///
/// Returns 0 when the mean is 0 or when all values are identical.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let all_equal = values.windows(2).all(|w| w[0] == w[1]);
    if all_equal {
        return 0.0;
    }
    ratio(std_dev(values), mean(values))
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clamps into `[0, 1]`, mapping NaN to 0.
pub fn unit_clamp(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Fractional days from `from` to `to`; negative spans clamp to 0.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = (to - from).num_milliseconds() as f64;
    (millis / MILLIS_PER_DAY).max(0.0)
}

/// Fractional minutes from `from` to `to`; negative spans clamp to 0.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = (to - from).num_milliseconds() as f64;
    (millis / 60_000.0).max(0.0)
}

/// Converts fractional days into a `Duration` at millisecond resolution.
///
/// Negative or NaN input gives zero; spans beyond what `Duration` can hold
/// give `None`.
pub fn days_to_duration(days: f64) -> Option<Duration> {
    if days.is_nan() || days <= 0.0 {
        return Some(Duration::zero());
    }
    let millis = (days * MILLIS_PER_DAY).round();
    if millis >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

/// `at` shifted forward by fractional days, saturating at the latest
/// representable instant.
pub fn add_days(at: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    days_to_duration(days)
        .and_then(|d| at.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
