//! Validation utilities for weather inputs

use crate::error::FeatureError;
use crate::models::HourlyObservation;

/// Longest possible lunar age in days, with a little slack for provider rounding
pub const MAX_MOON_AGE: f64 = 30.0;

/// Hourly rows must be in non-decreasing timestamp order
pub fn validate_hourly_sorted(rows: &[HourlyObservation]) -> Result<(), FeatureError> {
    match rows
        .windows(2)
        .position(|pair| pair[1].timestamp < pair[0].timestamp)
    {
        Some(position) => Err(FeatureError::UnsortedHourly {
            index: position + 1,
        }),
        None => Ok(()),
    }
}

/// Validate a lunar age reported by the tide provider
pub fn validate_moon_age(age: f64) -> Result<(), &'static str> {
    if !age.is_finite() {
        return Err("Moon age must be a finite number");
    }
    if !(0.0..=MAX_MOON_AGE).contains(&age) {
        return Err("Moon age must be between 0 and 30 days");
    }
    Ok(())
}
