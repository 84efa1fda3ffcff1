//! Date spreading formulas.
//!
//! Two different "spread N dates over a window" rules are in use and they
//! do not agree. [`distribute_inclusive`] hits both window endpoints;
//! [`distribute_stage`] divides by N and never reaches the end date. They are
//! kept apart on purpose: stage schedules and custom-cadence services have
//! always been dated differently, and existing projects depend on both.

use chrono::{Duration, NaiveDate};

/// `start + i * interval_days` for `i` in `0..count`, with no upper cap.
pub fn fixed_interval(start: NaiveDate, interval_days: i64, count: usize) -> Vec<NaiveDate> {
    (0..count)
        .map(|i| start + Duration::days(interval_days * i as i64))
        .collect()
}

/// Spreads `count` dates over `[start, end]` with both endpoints included.
///
/// `interval = total_days / (count - 1)` and date `i` is
/// `start + round(i * interval)` days, rounding half to even. A single date
/// sits on `start`. A missing or inverted window collapses onto `start`.
pub fn distribute_inclusive(start: NaiveDate, end: Option<NaiveDate>, count: usize) -> Vec<NaiveDate> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let total_days = end
                .map(|e| (e - start).num_days())
                .filter(|d| *d > 0)
                .unwrap_or(0);
            let interval = total_days as f64 / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    let offset = (i as f64 * interval).round_ties_even() as i64;
                    start + Duration::days(offset)
                })
                .collect()
        }
    }
}

/// Spreads `count` stage reviews from `start` with `interval = days / count`.
///
/// Date `i` is `start + floor(i * interval)` days, so the last review lands
/// one interval short of `end`.
pub fn distribute_stage(start: NaiveDate, end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    if count == 0 {
        return Vec::new();
    }
    let total_days = (end - start).num_days().max(0);
    let interval = total_days as f64 / count as f64;
    (0..count)
        .map(|i| start + Duration::days((i as f64 * interval).floor() as i64))
        .collect()
}
