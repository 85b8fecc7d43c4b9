//! Time handling utilities for hourly analysis loops.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Accepted layouts for run timestamps, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d_%H:%M:%S",
];

/// An inclusive range of hourly timestamps.
///
/// Inputs are expected at the top of an hour but are not normalized: a
/// misaligned start yields `start + k hours` for every `k` that stays at or
/// before `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl HourlyRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Parse both ends with [`parse_timestamp`].
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeParseError> {
        Ok(Self::new(parse_timestamp(start)?, parse_timestamp(end)?))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Iterate over every hour from start to end, both included.
    pub fn hours(&self) -> Hours {
        Hours {
            next: self.start,
            end: self.end,
        }
    }

    /// Number of timestamps [`HourlyRange::hours`] yields.
    pub fn len(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        ((self.end - self.start).num_seconds() / 3600) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Calendar day of the first timestamp.
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Calendar day of the last timestamp.
    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }
}

/// Iterator returned by [`HourlyRange::hours`].
#[derive(Debug, Clone)]
pub struct Hours {
    next: NaiveDateTime,
    end: NaiveDateTime,
}

impl Iterator for Hours {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.end {
            return None;
        }
        let current = self.next;
        self.next = current + Duration::hours(1);
        Some(current)
    }
}

/// Hydrological year label: months after June belong to the following year.
pub fn water_year<D: Datelike>(date: &D) -> i32 {
    if date.month() > 6 {
        date.year() + 1
    } else {
        date.year()
    }
}

/// Parse a naive timestamp such as `1993-03-12 00:00` or `1993-03-12T00:00:00`.
///
/// A bare date is read as midnight.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, TimeParseError> {
    let s = s.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(ts);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

/// Human readable span of days, e.g. `December 22-24, 1989`.
pub fn format_date_span(first: NaiveDate, last: NaiveDate) -> String {
    if first == last {
        first.format("%B %-d, %Y").to_string()
    } else if first.year() == last.year() && first.month() == last.month() {
        format!(
            "{} {}-{}, {}",
            first.format("%B"),
            first.day(),
            last.day(),
            first.year()
        )
    } else if first.year() == last.year() {
        format!(
            "{} - {}, {}",
            first.format("%B %-d"),
            last.format("%B %-d"),
            first.year()
        )
    } else {
        format!("{} - {}", first.format("%B %-d, %Y"), last.format("%B %-d, %Y"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}. Expected 'YYYY-MM-DD HH:MM'")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(ts("1993-03-12 06:00"), ts("1993-03-12T06:00:00"));
        assert_eq!(ts("1993-03-12").hour(), 0);
        assert_eq!(ts("1993-03-12_06:00:00").hour(), 6);
        assert!(parse_timestamp("March 12").is_err());
    }

    #[test]
    fn test_water_year() {
        assert_eq!(water_year(&ts("1993-03-12 00:00")), 1993);
        assert_eq!(water_year(&ts("1989-12-22 00:00")), 1990);
        assert_eq!(water_year(&ts("1990-06-30 23:00")), 1990);
        assert_eq!(water_year(&ts("1990-07-01 00:00")), 1991);
    }

    #[test]
    fn test_format_date_span() {
        let first = NaiveDate::from_ymd_opt(1989, 12, 22).unwrap();
        let last = NaiveDate::from_ymd_opt(1989, 12, 24).unwrap();
        assert_eq!(format_date_span(first, last), "December 22-24, 1989");

        let last = NaiveDate::from_ymd_opt(1990, 1, 2).unwrap();
        assert_eq!(
            format_date_span(first, last),
            "December 22, 1989 - January 2, 1990"
        );
    }
}
