//! Date handling shared by the review projection and the submission payload.
//!
//! Review screens show `DD-MM-YYYY`; the API expects `YYYY-MM-DD`. Both
//! directions accept either shape for user-entered signing dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

pub const REVIEW_FORMAT: &str = "%d-%m-%Y";
pub const API_FORMAT: &str = "%Y-%m-%d";
pub const PLACEHOLDER: &str = "-";

static DAY_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("day-first pattern compiles"));
static YEAR_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("year-first pattern compiles"));

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    API_FORMAT,
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Renders a calendar date the way review screens show it.
pub fn format_review_naive(date: NaiveDate) -> String {
    date.format(REVIEW_FORMAT).to_string()
}

/// Best-effort `DD-MM-YYYY` rendering of a stored date string.
///
/// Strings already shaped `DD-MM-YYYY` are returned verbatim, ISO and common
/// locale strings are re-rendered, anything else comes back unchanged. Empty
/// input renders the placeholder dash.
pub fn format_review_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER.to_string();
    }
    if DAY_FIRST.is_match(trimmed) {
        return trimmed.to_string();
    }
    match parse_loose(trimmed) {
        Some(date) => format_review_naive(date),
        None => raw.to_string(),
    }
}

/// Strict parse of a signing date entered as `DD-MM-YYYY` or `YYYY-MM-DD`.
pub fn parse_signing_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if DAY_FIRST.is_match(trimmed) {
        NaiveDate::parse_from_str(trimmed, REVIEW_FORMAT).ok()
    } else if YEAR_FIRST.is_match(trimmed) {
        NaiveDate::parse_from_str(trimmed, API_FORMAT).ok()
    } else {
        None
    }
}

/// Canonical `YYYY-MM-DD` form sent as `date_of_signing`.
pub fn format_submission_date(raw: &str) -> Option<String> {
    parse_signing_date(raw).map(|date| date.format(API_FORMAT).to_string())
}

fn parse_loose(value: &str) -> Option<NaiveDate> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.date_naive());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(value, format) {
            return Some(stamp.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_keeps_day_first_strings() {
        assert_eq!(format_review_date("05-03-2024"), "05-03-2024");
    }

    #[test]
    fn review_reformats_iso_and_locale_strings() {
        assert_eq!(format_review_date("2024-03-05"), "05-03-2024");
        assert_eq!(format_review_date("2024-03-05T10:20:30.000Z"), "05-03-2024");
        assert_eq!(format_review_date("2024-03-05T10:20:30"), "05-03-2024");
        assert_eq!(format_review_date("03/05/2024"), "05-03-2024");
        assert_eq!(format_review_date("March 5, 2024"), "05-03-2024");
    }

    #[test]
    fn review_falls_back_to_raw_or_placeholder() {
        assert_eq!(format_review_date("next spring"), "next spring");
        assert_eq!(format_review_date(""), "-");
        assert_eq!(format_review_date("   "), "-");
    }

    #[test]
    fn submission_accepts_both_shapes() {
        assert_eq!(format_submission_date("05-03-2024").as_deref(), Some("2024-03-05"));
        assert_eq!(format_submission_date("2024-03-05").as_deref(), Some("2024-03-05"));
        assert_eq!(format_submission_date("2024/03/05"), None);
        assert_eq!(format_submission_date("31-02-2024"), None);
        assert_eq!(format_submission_date("5-3-2024"), None);
    }

    #[test]
    fn review_and_submission_agree_on_calendar_date() {
        let mut date = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        while date <= end {
            let day_first = date.format(REVIEW_FORMAT).to_string();
            let year_first = date.format(API_FORMAT).to_string();
            for input in [&day_first, &year_first] {
                let reviewed = format_review_date(input);
                let submitted = format_submission_date(input).unwrap();
                let from_review = NaiveDate::parse_from_str(&reviewed, REVIEW_FORMAT).unwrap();
                let from_submit = NaiveDate::parse_from_str(&submitted, API_FORMAT).unwrap();
                assert_eq!(from_review, date);
                assert_eq!(from_submit, date);
            }
            date = date.succ_opt().unwrap();
        }
    }
}
