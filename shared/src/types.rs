//! Common types used across the platform

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Inclusive date range for queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range spanning `before` days before `anchor` through `after` days after it
    pub fn around(anchor: NaiveDate, before: i64, after: i64) -> Self {
        Self {
            start: anchor - Duration::days(before),
            end: anchor + Duration::days(after),
        }
    }

    /// Number of calendar days covered, both ends included
    pub fn len_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1).max(0) as usize
    }

    /// Iterate every date in the range in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.len_days() as i64).map(move |offset| self.start + Duration::days(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_window_spans_ten_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let range = DateRange::around(today, 2, 7);

        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 3, 13).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 3, 22).unwrap());
        assert_eq!(range.len_days(), 10);

        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 10);
        assert_eq!(days[2], today);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let range = DateRange::new(start, start - Duration::days(1));
        assert_eq!(range.len_days(), 0);
        assert_eq!(range.days().count(), 0);
    }
}
