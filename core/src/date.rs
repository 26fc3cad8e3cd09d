//! Normalisation of loosely formatted date expressions to calendar dates.
//!
//! Historical requests address a single day, so anything carrying a time or
//! an offset is cut down to the date exactly as written. No timezone
//! conversion happens: `2012-12-12T23:59:59+05:00` is the 12th.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

// Slashes with the year last read month-first, dashes and dots day-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
];

/// Parse `input` into a calendar date, or `None` if no known form matches.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(date) = relative(input) {
        return Some(date);
    }
    if let Some(date) = compact(input) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.date_naive());
    }
    if let Some(date) = date_time(input) {
        return Some(date);
    }
    if let Some(date) = strip_zone(input).and_then(date_time) {
        return Some(date);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

/// Render a date the way the API expects it in paths and payloads.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn date_time(input: &str) -> Option<NaiveDate> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
}

/// Drop a trailing zone after a time: ` UTC`, ` GMT`, `Z`, or `±HH[:]MM`
/// with or without a leading space. Returns `None` if there is none.
fn strip_zone(input: &str) -> Option<&str> {
    for suffix in [" UTC", " GMT", "Z"] {
        if let Some(rest) = input.strip_suffix(suffix) {
            return Some(rest.trim_end());
        }
    }
    let sign = input.rfind(|c: char| c == '+' || c == '-')?;
    let (rest, offset) = input.split_at(sign);
    let digits: String = offset[1..].chars().filter(|c| *c != ':').collect();
    let is_offset = offset.len() <= 6
        && digits.len() == 4
        && digits.bytes().all(|b| b.is_ascii_digit());
    if is_offset && rest.contains(':') {
        Some(rest.trim_end())
    } else {
        None
    }
}

fn relative(input: &str) -> Option<NaiveDate> {
    let today = Local::now().date_naive();
    match input.to_ascii_lowercase().as_str() {
        "today" | "now" => Some(today),
        "yesterday" => today.checked_sub_signed(Duration::days(1)),
        "tomorrow" => today.checked_add_signed(Duration::days(1)),
        _ => None,
    }
}

/// `YYYYMMDD` with no separators.
fn compact(input: &str) -> Option<NaiveDate> {
    if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = input[0..4].parse().ok()?;
    let month = input[4..6].parse().ok()?;
    let day = input[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
