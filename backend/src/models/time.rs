//! Calendar helpers shared by the forecast engine, the CSV importer and the
//! persistence layer.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Canonical wire and storage format for observation dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Alternative format accepted on import (common in spreadsheet exports).
pub const SLASH_DATE_FORMAT: &str = "%Y/%m/%d";

/// Parse a calendar date in `YYYY-MM-DD` or `YYYY/MM/DD` form.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, SLASH_DATE_FORMAT))
        .ok()
}

/// Format a date using [`DATE_FORMAT`].
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Saturday and Sunday carry the weekend uplift.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// 1-based day of the year (January 1st is 1).
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// `date + days`, saturating at the calendar bounds chrono supports.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}
