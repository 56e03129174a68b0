//! # Human Durations
//!
//! Renders a span of days in the coarsest unit whose bucket still contains
//! it, and parses such strings back to days.
//!
//! | Span (days) | Rendered as |
//! |-------------|-------------|
//! | ≤ 7         | days        |
//! | ≤ 30        | weeks       |
//! | ≤ 365       | months      |
//! | otherwise   | years       |
//!
//! Counts round up, so the parsed value is never shorter than the span.

const DAYS_PER_WEEK: i64 = 7;
const DAYS_PER_MONTH: i64 = 30;
const DAYS_PER_YEAR: i64 = 365;

/// Render a non-negative span of days, e.g. `"3 weeks"`.
///
/// Negative spans are treated as zero.
pub fn format_duration_days(days: i64) -> String {
    let days = days.max(0);
    let (count, unit) = if days <= DAYS_PER_WEEK {
        (days, "day")
    } else if days <= DAYS_PER_MONTH {
        (ceil_div(days, DAYS_PER_WEEK), "week")
    } else if days <= DAYS_PER_YEAR {
        (ceil_div(days, DAYS_PER_MONTH), "month")
    } else {
        (ceil_div(days, DAYS_PER_YEAR), "year")
    };
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Parse a duration produced by [`format_duration_days`] back to days.
///
/// Accepts singular or plural units, case-insensitive. Returns `None` for
/// anything else.
pub fn parse_duration(s: &str) -> Option<i64> {
    let mut parts = s.split_whitespace();
    let count: i64 = parts.next()?.parse().ok()?;
    let unit = parts.next()?.to_lowercase();
    if parts.next().is_some() || count < 0 {
        return None;
    }
    let per_unit = match unit.strip_suffix('s').unwrap_or(unit.as_str()) {
        "day" => 1,
        "week" => DAYS_PER_WEEK,
        "month" => DAYS_PER_MONTH,
        "year" => DAYS_PER_YEAR,
        _ => return None,
    };
    count.checked_mul(per_unit)
}

fn ceil_div(n: i64, d: i64) -> i64 {
    (n + d - 1) / d
}
