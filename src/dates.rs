//! Lenient publish-date normalisation.
//!
//! Feeds write dates in whatever shape their generator prefers. Everything the
//! store holds is `YYYY-MM-DD`, so [`normalize_date`] tries the formats seen in
//! practice, most specific first, and keeps the calendar date exactly as
//! written. A timestamp of `2024-03-03T23:30:00-05:00` stays `2024-03-03`;
//! there is no timezone conversion.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DateError {
    #[error("Unable to parse the date: {0:?}")]
    Unparseable(String),
}

/// Datetime formats with a numeric offset that RFC 3339 parsing rejects.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%d %H:%M:%S%z"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// chrono's `%B` and `%b` both accept full and abbreviated month names.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
    "%A %B %d %Y",
    "%a, %d %b %Y",
    "%Y/%m/%d",
    "%m/%d/%Y",
];

/// Parse `raw` and format it as `YYYY-MM-DD`.
pub fn normalize_date(raw: &str) -> Result<String, DateError> {
    parse_date(raw.trim())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| DateError::Unparseable(raw.to_string()))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.date_naive());
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    let s = strip_ordinals(s);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&s, fmt).ok())
}

/// `3rd March 2024` → `3 March 2024`. Only suffixes directly after a digit
/// are removed.
fn strip_ordinals(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        out.push(c);
        rest = &rest[c.len_utf8()..];
        if c.is_ascii_digit() {
            for suffix in ["st", "nd", "rd", "th"] {
                let Some(after) = rest.strip_prefix(suffix) else {
                    continue;
                };
                if !after.starts_with(|n: char| n.is_alphanumeric()) {
                    rest = after;
                    break;
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        normalize_date(s).unwrap()
    }

    #[test]
    fn rfc3339_keeps_written_date() {
        assert_eq!(norm("2024-03-03T10:15:00Z"), "2024-03-03");
        assert_eq!(norm("2024-03-03T23:30:00-05:00"), "2024-03-03");
        assert_eq!(norm("2024-03-03T00:10:00.123+02:00"), "2024-03-03");
    }

    #[test]
    fn rfc2822_feed_dates() {
        assert_eq!(norm("Sun, 03 Mar 2024 10:15:00 +0000"), "2024-03-03");
        assert_eq!(norm("Sun, 3 Mar 2024 10:15:00 GMT"), "2024-03-03");
    }

    #[test]
    fn iso_variants() {
        assert_eq!(norm("2024-03-03"), "2024-03-03");
        assert_eq!(norm("2024-03-03 10:15:00"), "2024-03-03");
        assert_eq!(norm("2024-03-03T10:15"), "2024-03-03");
        assert_eq!(norm("2024-03-03T10:15:00+0100"), "2024-03-03");
    }

    #[test]
    fn written_out_dates() {
        assert_eq!(norm("March 3, 2024"), "2024-03-03");
        assert_eq!(norm("Mar 3, 2024"), "2024-03-03");
        assert_eq!(norm("3 March 2024"), "2024-03-03");
        assert_eq!(norm("Sunday, March 3, 2024"), "2024-03-03");
    }

    #[test]
    fn written_out_dates_without_commas() {
        assert_eq!(norm("March 3 2024"), "2024-03-03");
        assert_eq!(norm("Mar 3 2024"), "2024-03-03");
        assert_eq!(norm("3 March, 2024"), "2024-03-03");
        assert_eq!(norm("Sunday March 3 2024"), "2024-03-03");
    }

    #[test]
    fn ordinal_days() {
        assert_eq!(norm("3rd March 2024"), "2024-03-03");
        assert_eq!(norm("March 1st, 2024"), "2024-03-01");
        assert_eq!(norm("22nd Mar 2024"), "2024-03-22");
        assert_eq!(norm("August 11th 2024"), "2024-08-11");
    }

    #[test]
    fn slash_dates_are_month_first() {
        assert_eq!(norm("2024/03/04"), "2024-03-04");
        assert_eq!(norm("03/04/2024"), "2024-03-04");
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert_eq!(norm("  2024-03-03\n"), "2024-03-03");
    }

    #[test]
    fn garbage_is_an_error() {
        assert_eq!(
            normalize_date("not a date"),
            Err(DateError::Unparseable("not a date".to_string()))
        );
        assert!(normalize_date("").is_err());
        assert!(normalize_date("2024-13-45").is_err());
    }
}
