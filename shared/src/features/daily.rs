//! Per-date feature extraction from the hourly weather table

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::direction::circular_mean_direction;
use crate::error::FeatureError;
use crate::holidays::HolidayCalendar;
use crate::models::{DailyFeatureRecord, HourlyObservation};
use crate::validation::validate_hourly_sorted;

/// Builds one [`DailyFeatureRecord`] per target date.
///
/// Weather windows are anchored on the target date `D`:
///
/// | window          | span                                  |
/// |-----------------|---------------------------------------|
/// | temperature/precipitation | D 10:00 ..= D+1 04:00        |
/// | wind            | D 20:00 ..= D+1 04:00                 |
/// | `10_13`         | D 10:00 ..= D 13:59                   |
/// | `14_17`         | D 14:00 ..= D 17:59                   |
/// | `18_21`         | D 18:00 ..= D 21:59                   |
/// | `22_0`          | D 22:00 ..= D+1 00:59                 |
/// | `1_4`           | D+1 01:00 ..= D+1 04:59               |
pub struct DailyFeatureBuilder {
    calendar: Box<dyn HolidayCalendar>,
}

impl DailyFeatureBuilder {
    pub fn new(calendar: Box<dyn HolidayCalendar>) -> Self {
        Self { calendar }
    }

    /// Build the feature record for `target_date`.
    ///
    /// `hourly` must be sorted by timestamp; it may span many days and only
    /// the rows inside each window are used. Empty windows produce `None`.
    pub fn build(
        &self,
        target_date: NaiveDate,
        hourly: &[HourlyObservation],
        moon_age: f64,
    ) -> Result<DailyFeatureRecord, FeatureError> {
        validate_hourly_sorted(hourly)?;

        let next_day = target_date + Duration::days(1);

        let main = slice_between(hourly, at(target_date, 10, 0), at(next_day, 4, 0));
        let wind = slice_between(hourly, at(target_date, 20, 0), at(next_day, 4, 0));

        let w10_13 = slice_between(hourly, at(target_date, 10, 0), at(target_date, 13, 59));
        let w14_17 = slice_between(hourly, at(target_date, 14, 0), at(target_date, 17, 59));
        let w18_21 = slice_between(hourly, at(target_date, 18, 0), at(target_date, 21, 59));
        let w22_0 = slice_between(hourly, at(target_date, 22, 0), at(next_day, 0, 59));
        let w1_4 = slice_between(hourly, at(next_day, 1, 0), at(next_day, 4, 59));

        let temperatures = |rows: &[HourlyObservation]| -> Vec<f64> {
            rows.iter().filter_map(|r| r.temperature_celsius).collect()
        };
        let precipitation = |rows: &[HourlyObservation]| -> Vec<f64> {
            rows.iter().filter_map(|r| r.precipitation_mm).collect()
        };

        let main_temps = temperatures(main);
        let main_precip = precipitation(main);
        let wind_speeds: Vec<f64> = wind.iter().filter_map(|r| r.wind_speed_ms).collect();

        let precipitation_sum = sum(&main_precip);
        let weekday = target_date.weekday();

        Ok(DailyFeatureRecord {
            date: target_date,
            year: target_date.year(),
            month: target_date.month(),
            day: target_date.day(),
            weekday: weekday.num_days_from_monday(),
            week_of_year: target_date.iso_week().week(),
            week_of_month: (target_date.day() - 1) / 7 + 1,
            day_of_year: target_date.ordinal(),
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
            is_holiday: self.calendar.is_holiday(target_date),
            moon_age,

            temperature_mean: mean(&main_temps),
            temperature_max: max(&main_temps),
            temperature_min: min(&main_temps),
            temperature_std: sample_std(&main_temps),
            temperature_mean_10_13: mean(&temperatures(w10_13)),
            temperature_mean_14_17: mean(&temperatures(w14_17)),
            temperature_mean_18_21: mean(&temperatures(w18_21)),
            temperature_mean_22_0: mean(&temperatures(w22_0)),
            temperature_mean_1_4: mean(&temperatures(w1_4)),

            precipitation_sum,
            precipitation_binary: precipitation_sum.map(|s| if s > 0.0 { 1.0 } else { 0.0 }),
            precipitation_sum_10_13: sum(&precipitation(w10_13)),
            precipitation_sum_14_17: sum(&precipitation(w14_17)),
            precipitation_sum_18_21: sum(&precipitation(w18_21)),
            precipitation_sum_22_0: sum(&precipitation(w22_0)),
            precipitation_sum_1_4: sum(&precipitation(w1_4)),

            wind_speed_mean: mean(&wind_speeds),
            wind_speed_max: max(&wind_speeds),
            wind_speed_min: min(&wind_speeds),
            wind_speed_std: sample_std(&wind_speeds),
            wind_direction_mean: circular_mean_direction(
                wind.iter().map(HourlyObservation::wind_direction_label),
            )
            .map(|d| d.index() as f64),
        })
    }
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    // hour/minute come from the fixed window table above
    date.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN))
}

/// Rows with `start <= timestamp <= end`; `rows` must be sorted
fn slice_between(
    rows: &[HourlyObservation],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> &[HourlyObservation] {
    let lo = rows.partition_point(|r| r.timestamp < start);
    let hi = rows.partition_point(|r| r.timestamp <= end);
    if lo >= hi {
        &[]
    } else {
        &rows[lo..hi]
    }
}

fn sum(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum())
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    sum(values).map(|s| s / values.len() as f64)
}

fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Sample standard deviation (n - 1); needs at least two values
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}
