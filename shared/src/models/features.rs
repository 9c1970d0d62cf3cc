//! Daily feature records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Feature vector for one target date before table-level engineering.
///
/// Calendar fields and the lunar age are always present. Weather aggregates
/// are `None` when their window had too few samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFeatureRecord {
    pub date: NaiveDate,

    // Calendar
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// 0 = Monday
    pub weekday: u32,
    pub week_of_year: u32,
    pub week_of_month: u32,
    pub day_of_year: u32,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub moon_age: f64,

    // Temperature, 10:00 to 04:00 the next day
    pub temperature_mean: Option<f64>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub temperature_std: Option<f64>,
    pub temperature_mean_10_13: Option<f64>,
    pub temperature_mean_14_17: Option<f64>,
    pub temperature_mean_18_21: Option<f64>,
    pub temperature_mean_22_0: Option<f64>,
    pub temperature_mean_1_4: Option<f64>,

    // Precipitation, same window as temperature
    pub precipitation_sum: Option<f64>,
    pub precipitation_binary: Option<f64>,
    pub precipitation_sum_10_13: Option<f64>,
    pub precipitation_sum_14_17: Option<f64>,
    pub precipitation_sum_18_21: Option<f64>,
    pub precipitation_sum_22_0: Option<f64>,
    pub precipitation_sum_1_4: Option<f64>,

    // Wind, 20:00 to 04:00 the next day
    pub wind_speed_mean: Option<f64>,
    pub wind_speed_max: Option<f64>,
    pub wind_speed_min: Option<f64>,
    pub wind_speed_std: Option<f64>,
    /// Sector index (0-15) of the circular mean direction
    pub wind_direction_mean: Option<f64>,
}

impl DailyFeatureRecord {
    /// Column names in table order, matching [`DailyFeatureRecord::values`]
    pub const COLUMNS: [&'static str; 31] = [
        "year",
        "month",
        "day",
        "weekday",
        "week_of_year",
        "week_of_month",
        "day_of_year",
        "is_weekend",
        "is_holiday",
        "moon_age",
        "temperature_mean",
        "temperature_max",
        "temperature_min",
        "temperature_std",
        "temperature_mean_10_13",
        "temperature_mean_14_17",
        "temperature_mean_18_21",
        "temperature_mean_22_0",
        "temperature_mean_1_4",
        "precipitation_sum",
        "precipitation_binary",
        "precipitation_sum_10_13",
        "precipitation_sum_14_17",
        "precipitation_sum_18_21",
        "precipitation_sum_22_0",
        "precipitation_sum_1_4",
        "wind_speed_mean",
        "wind_speed_max",
        "wind_speed_min",
        "wind_speed_std",
        "wind_direction_mean",
    ];

    /// Values in the same order as [`DailyFeatureRecord::COLUMNS`]
    pub fn values(&self) -> Vec<Option<f64>> {
        vec![
            Some(self.year as f64),
            Some(self.month as f64),
            Some(self.day as f64),
            Some(self.weekday as f64),
            Some(self.week_of_year as f64),
            Some(self.week_of_month as f64),
            Some(self.day_of_year as f64),
            Some(bool_to_f64(self.is_weekend)),
            Some(bool_to_f64(self.is_holiday)),
            Some(self.moon_age),
            self.temperature_mean,
            self.temperature_max,
            self.temperature_min,
            self.temperature_std,
            self.temperature_mean_10_13,
            self.temperature_mean_14_17,
            self.temperature_mean_18_21,
            self.temperature_mean_22_0,
            self.temperature_mean_1_4,
            self.precipitation_sum,
            self.precipitation_binary,
            self.precipitation_sum_10_13,
            self.precipitation_sum_14_17,
            self.precipitation_sum_18_21,
            self.precipitation_sum_22_0,
            self.precipitation_sum_1_4,
            self.wind_speed_mean,
            self.wind_speed_max,
            self.wind_speed_min,
            self.wind_speed_std,
            self.wind_direction_mean,
        ]
    }
}

fn bool_to_f64(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
