//! Day-granularity date parsing and ranges.
//!
//! Backends send dates as ISO-8601 strings, sometimes plain dates
//! (`2024-03-07`), sometimes full timestamps (`2024-03-07T18:22:01.512Z`).
//! Filtering and sorting compare calendar days only, so every accepted form
//! is reduced to a [`NaiveDate`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a date-like string into a calendar day.
///
/// Accepted forms, tried in order:
/// - `YYYY-MM-DD`
/// - RFC 3339 (`2024-03-07T18:22:01Z`, `2024-03-07T18:22:01+02:00`); the
///   date is taken in the timestamp's own offset
/// - `YYYY-MM-DDTHH:MM:SS[.fff]` and the same with a space separator
///
/// Returns `None` for anything else.
///
/// ```
/// use stockroom_query::parse_date;
///
/// assert!(parse_date("2024-03-07").is_some());
/// assert_eq!(parse_date("2024-03-07T23:59:59.999Z"), parse_date("2024-03-07"));
/// assert!(parse_date("07/03/2024").is_none());
/// ```
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Inclusive date range over a named field.
///
/// Either bound may be absent, in which case the range is open on that side.
/// A range with neither bound does not filter anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    /// Field holding the date.
    pub field: String,
    /// First day included.
    pub start: Option<NaiveDate>,
    /// Last day included.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range over `field`.
    pub fn new(field: impl Into<String>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        DateRange {
            field: field.into(),
            start,
            end,
        }
    }

    /// Returns `true` if at least one bound is set.
    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Returns `true` if `day` falls within the range, bounds included.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start.map_or(true, |start| start <= day) && self.end.map_or(true, |end| day <= end)
    }
}
