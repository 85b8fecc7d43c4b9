//! Tests for the hourly range generator.

use chrono::{Duration, NaiveDateTime};
use wx_common::time::{parse_timestamp, HourlyRange};

fn ts(s: &str) -> NaiveDateTime {
    parse_timestamp(s).unwrap()
}

// ============================================================================
// Inclusivity
// ============================================================================

#[test]
fn test_range_includes_both_ends() {
    let range = HourlyRange::parse("1993-03-12 00:00", "1993-03-14 23:00").unwrap();
    let hours: Vec<_> = range.hours().collect();

    assert_eq!(hours.first(), Some(&ts("1993-03-12 00:00")));
    assert_eq!(hours.last(), Some(&ts("1993-03-14 23:00")));
    assert_eq!(hours.len(), 72);
    assert_eq!(range.len(), 72);
}

#[test]
fn test_range_is_hourly_and_ordered() {
    let range = HourlyRange::parse("1989-12-31 22:00", "1990-01-01 02:00").unwrap();
    let hours: Vec<_> = range.hours().collect();
    assert_eq!(hours.len(), 5);
    for pair in hours.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::hours(1));
    }
}

#[test]
fn test_single_hour_range() {
    let range = HourlyRange::parse("2024-01-15 12:00", "2024-01-15 12:00").unwrap();
    assert_eq!(range.hours().count(), 1);
    assert_eq!(range.len(), 1);
}

#[test]
fn test_inverted_range_is_empty() {
    let range = HourlyRange::parse("2024-01-15 12:00", "2024-01-15 11:00").unwrap();
    assert!(range.is_empty());
    assert_eq!(range.len(), 0);
    assert_eq!(range.hours().count(), 0);
}

// ============================================================================
// Misaligned inputs
// ============================================================================

#[test]
fn test_misaligned_start_is_not_normalized() {
    let range = HourlyRange::parse("2024-01-15 00:30", "2024-01-15 03:00").unwrap();
    let hours: Vec<_> = range.hours().collect();
    assert_eq!(
        hours,
        vec![
            ts("2024-01-15 00:30"),
            ts("2024-01-15 01:30"),
            ts("2024-01-15 02:30"),
        ]
    );
    assert_eq!(range.len(), hours.len());
}

#[test]
fn test_day_span() {
    let range = HourlyRange::parse("1989-12-22 00:00", "1989-12-24 23:00").unwrap();
    assert_eq!(range.first_day().to_string(), "1989-12-22");
    assert_eq!(range.last_day().to_string(), "1989-12-24");
}
