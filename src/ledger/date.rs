//! Helpers for the `"Month Day"` date text stored on rows.
//!
//! Row dates are free-form text. Only the day number is ever relied upon (for
//! per-day aggregation); the month name is used for ordering when present.

use chrono::{Datelike, Local, Month, NaiveDate};

/// Formats a month number (1-12) and day as `"March 14"`.
pub fn format_date(month: u32, day: u32) -> Option<String> {
    let month = u8::try_from(month).ok().and_then(|m| Month::try_from(m).ok())?;
    Some(format!("{} {}", month.name(), day))
}

/// Today's date in row format.
pub fn today() -> String {
    let now = Local::now().date_naive();
    format!("{} {}", month_name(now.month()), now.day())
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("January")
}

/// Extracts the day number from `"Month Day"` text.
pub fn parse_day(text: &str) -> Option<u32> {
    let mut parts = text.split_whitespace();
    parts.next()?;
    parts.next()?.parse().ok()
}

/// Extracts the month number (1-12) from `"Month Day"` text. Accepts full
/// names and three-letter abbreviations in any case.
pub fn parse_month(text: &str) -> Option<u32> {
    let token = text.split_whitespace().next()?;
    token.parse::<Month>().ok().map(|m| m.number_from_month())
}

/// Ordering key used when sorting rows by date. Unparseable parts sort first.
pub fn sort_key(text: &str) -> (u32, u32) {
    (
        parse_month(text).unwrap_or(0),
        parse_day(text).unwrap_or(0),
    )
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Length of the month the local clock is currently in.
pub fn days_in_current_month() -> u32 {
    let now = Local::now().date_naive();
    days_in_month(now.year(), now.month()).unwrap_or(31)
}

/// Every day of `month` formatted for a date picker, e.g. `["May 1", ...]`.
pub fn days_of_month(month: u32, days: u32) -> Vec<String> {
    (1..=days)
        .filter_map(|day| format_date(month, day))
        .collect()
}
