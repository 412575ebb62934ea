//! Date helper functions
//!
//! Posts carry calendar dates only. They are written as ISO dates in front
//! matter and displayed per language, `April 15, 2025` or `2025年4月15日`;
//! both display forms must read back to the same date.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

use crate::i18n::Language;

lazy_static! {
    /// `YYYY年M月D日`, optional spaces between the parts
    static ref LOCALIZED_NUMERIC_DATE: Regex =
        Regex::new(r"(\d{4})\s*年\s*(\d{1,2})\s*月\s*(\d{1,2})\s*日").unwrap();
}

const DATE_TIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    // Natural language, as rendered by en-US locales
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
];

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a date written in any supported form
///
/// Accepts ISO dates and date-times, RFC 3339, the localized numeric form
/// `YYYY年M月D日` and natural-language English dates such as
/// `April 15, 2025` or `Apr 15, 2025`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if s.is_empty() {
        return None;
    }

    if let Some(date) = parse_localized_numeric(s) {
        return Some(date);
    }

    for fmt in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    // RFC 3339 / ISO 8601 with offset keeps the written calendar day
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    None
}

/// Parse `YYYY年M月D日` directly from its three numeric groups
pub fn parse_localized_numeric(s: &str) -> Option<NaiveDate> {
    let caps = LOCALIZED_NUMERIC_DATE.captures(s)?;
    let year = caps[1].parse::<i32>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    let day = caps[3].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Format a date the way a reader in `lang` expects to see it
pub fn display_date(date: &NaiveDate, lang: Language) -> String {
    match lang {
        Language::En => date.format("%B %-d, %Y").to_string(),
        Language::ZhTw => format!("{}年{}月{}日", date.year(), date.month(), date.day()),
    }
}

/// Format a date as `YYYY-MM-DD`
pub fn iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
