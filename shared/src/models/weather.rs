//! Weather data models

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::direction::CompassDirection;
use crate::types::GpsCoordinates;

/// One hour of weather as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyWeatherRecord {
    pub timestamp: NaiveDateTime,
    pub temperature_celsius: Option<f64>,
    pub precipitation_mm: Option<f64>,
    /// Wind speed in provider units (km/h)
    pub wind_speed: Option<f64>,
    pub wind_direction_deg: Option<f64>,
}

impl HourlyWeatherRecord {
    /// Wind speed in m/s, rounded to one decimal (ties to even)
    pub fn wind_speed_ms(&self) -> Option<f64> {
        self.wind_speed
            .map(|kmh| (kmh * 1000.0 / 3600.0 * 10.0).round_ties_even() / 10.0)
    }

    pub fn wind_direction(&self) -> Option<CompassDirection> {
        self.wind_direction_deg
            .and_then(CompassDirection::from_degrees)
    }
}

/// Hourly record with derived wind fields, the input grain for daily features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyObservation {
    pub timestamp: NaiveDateTime,
    pub temperature_celsius: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub wind_direction: Option<CompassDirection>,
}

impl From<&HourlyWeatherRecord> for HourlyObservation {
    fn from(record: &HourlyWeatherRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            temperature_celsius: record.temperature_celsius,
            precipitation_mm: record.precipitation_mm,
            wind_speed_ms: record.wind_speed_ms(),
            wind_direction: record.wind_direction(),
        }
    }
}

impl HourlyObservation {
    /// Compass label for the wind direction, empty when unknown
    pub fn wind_direction_label(&self) -> &'static str {
        self.wind_direction.map(|d| d.label()).unwrap_or("")
    }
}

/// Daily weather summary for one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeatherSummary {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub temperature_max: f64,
    pub temperature_min: f64,
    /// Maximum precipitation probability (0-100)
    pub precipitation_probability_max: i32,
    pub dominant_wind_direction: i32,
}

/// Weather fetched for a contiguous range of dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: GpsCoordinates,
    pub hourly: Vec<HourlyWeatherRecord>,
    pub daily: Vec<DailyWeatherSummary>,
}

impl WeatherReport {
    pub fn daily_for(&self, date: NaiveDate) -> Option<&DailyWeatherSummary> {
        self.daily.iter().find(|d| d.date == date)
    }

    pub fn observations(&self) -> Vec<HourlyObservation> {
        self.hourly.iter().map(HourlyObservation::from).collect()
    }
}
