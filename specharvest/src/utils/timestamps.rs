//! Timestamp parsing for listing dates.
//!
//! Listing pages print publication dates as free text ("March 5th, 2024",
//! "Published: 05 Mar 2024", "2024-03-05"). Everything parsed here is
//! normalized to UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Represents a timestamp that can be serialized/deserialized.
pub type Timestamp = DateTime<Utc>;

/// Errors that can occur during timestamp parsing.
#[derive(Debug, Error)]
pub enum TimestampError {
    /// The timestamp string is empty.
    #[error("Empty timestamp string")]
    EmptyString,

    /// The timestamp value is invalid.
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%B %d %Y %H:%M:%S",
    "%b %d %Y %H:%M:%S",
    "%d %B %Y %H:%M",
    "%d %b %Y %H:%M",
];

/// Years below this come from a short year token, not a real date.
const MIN_YEAR: i32 = 1000;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d %Y",   // March 5 2024
    "%b %d %Y",   // Mar 5 2024
    "%d %B %Y",   // 5 March 2024
    "%d %b %Y",   // 5 Mar 2024
    "%m/%d/%Y",   // 03/05/2024
    "%d/%m/%Y",   // 25/03/2024
    "%Y/%m/%d",   // 2024/03/05
    "%d.%m.%Y",   // 05.03.2024
    "%d-%b-%Y",   // 05-Mar-2024
];

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(published|updated|released|date)(\s+on)?\s*:?\s*")
            .unwrap_or_else(|_| unreachable!("static regex"))
    })
}

fn ordinal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b")
            .unwrap_or_else(|_| unreachable!("static regex"))
    })
}

fn month_year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\p{L}+)\.? (\d{4})$").unwrap_or_else(|_| unreachable!("static regex"))
    })
}

fn sept_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bsept\b\.?").unwrap_or_else(|_| unreachable!("static regex"))
    })
}

/// Returns the current UTC timestamp.
#[must_use]
pub fn now_utc() -> Timestamp {
    Utc::now()
}

/// Formats a timestamp as ISO 8601 string.
#[must_use]
pub fn format_iso8601(dt: &Timestamp) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

/// Parses a timestamp from structured or human-readable text.
///
/// Supports RFC 3339 / ISO 8601, RFC 2822 and the common English
/// day-month-year layouts. Labels ("Published:"), ordinal suffixes
/// ("5th"), stray commas and the "Sept" abbreviation are tolerated.
/// Month-only dates ("March 2024") resolve to the first of the month.
///
/// # Errors
///
/// Returns `TimestampError` if the input cannot be parsed.
pub fn parse_timestamp(input: &str) -> Result<Timestamp, TimestampError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::EmptyString);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let cleaned = clean_date_text(trimmed);
    if cleaned.is_empty() {
        return Err(TimestampError::EmptyString);
    }

    // Month and year only. Checked first: "%B %d %Y" would read
    // "December 2024" as the 20th of December in year 24.
    if let Some(caps) = month_year_pattern().captures(&cleaned) {
        let with_day = format!("1 {} {}", &caps[1], &caps[2]);
        for fmt in ["%d %B %Y", "%d %b %Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(&with_day, fmt) {
                return Ok(start_of_day(date));
            }
        }
        return Err(TimestampError::InvalidFormat(trimmed.to_string()));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&cleaned, fmt) {
            if naive.year() >= MIN_YEAR {
                return Ok(Utc.from_utc_datetime(&naive));
            }
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, fmt) {
            if date.year() >= MIN_YEAR {
                return Ok(start_of_day(date));
            }
        }
    }

    Err(TimestampError::InvalidFormat(trimmed.to_string()))
}

/// Parses the published text of a listing row.
///
/// Returns `None` when the text cannot be read as a date.
#[must_use]
pub fn parse_published(text: &str) -> Option<Timestamp> {
    parse_timestamp(text).ok()
}

fn start_of_day(date: NaiveDate) -> Timestamp {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

fn clean_date_text(text: &str) -> String {
    let text = label_pattern().replace(text, "");
    let text = ordinal_pattern().replace_all(&text, "$1");
    let text = sept_pattern().replace_all(&text, "Sep");
    text.replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
