//! Prediction output models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::weather::DailyWeatherSummary;

/// Predicted amount for one day, with the inputs a client displays next to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub date: NaiveDate,
    pub predicted_amount: f64,
    pub moon_age: f64,
    pub weather_code: i32,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub precipitation_probability_max: i32,
    pub dominant_wind_direction: i32,
}

impl PredictionRecord {
    pub fn new(predicted_amount: f64, moon_age: f64, daily: &DailyWeatherSummary) -> Self {
        Self {
            date: daily.date,
            predicted_amount,
            moon_age,
            weather_code: daily.weather_code,
            temperature_max: daily.temperature_max,
            temperature_min: daily.temperature_min,
            precipitation_probability_max: daily.precipitation_probability_max,
            dominant_wind_direction: daily.dominant_wind_direction,
        }
    }
}
