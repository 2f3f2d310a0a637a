// Utility functions
use chrono::{DateTime, NaiveDate, Utc};

/// Parses an ISO `YYYY-MM-DD` date, if possible.
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

/// Formats a date the way the report shows it: `dd-mm-YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Unix seconds at midnight UTC of `date`.
pub fn date_to_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// UTC calendar date of a Unix timestamp.
pub fn timestamp_to_date(ts: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}
