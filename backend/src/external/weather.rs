//! Weather API client for fetching weather data
//!
//! Integrates with the Open-Meteo forecast API, which serves past days and
//! forecasts through the same endpoint as parallel hourly/daily arrays.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use shared::{DailyWeatherSummary, DateRange, GpsCoordinates, HourlyWeatherRecord, WeatherReport};

use super::http::{get_json, FetchError, RetryPolicy};
use super::WeatherSource;
use crate::config::Config;

const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max,wind_direction_10m_dominant";
const HOURLY_FIELDS: &str = "temperature_2m,precipitation,wind_speed_10m,wind_direction_10m";

const HOURLY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Open-Meteo API client
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    location: GpsCoordinates,
    timezone: String,
    retry: RetryPolicy,
}

/// Open-Meteo API response for the forecast endpoint
#[derive(Debug, Deserialize)]
pub struct OpenMeteoResponse {
    latitude: f64,
    longitude: f64,
    hourly: OpenMeteoHourly,
    daily: OpenMeteoDaily,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoHourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    precipitation: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
    wind_direction_10m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoDaily {
    time: Vec<String>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_probability_max: Vec<i32>,
    wind_direction_10m_dominant: Vec<i32>,
}

impl OpenMeteoClient {
    /// Create a new client around a shared connection pool
    pub fn new(
        client: Client,
        base_url: String,
        location: GpsCoordinates,
        timezone: String,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            base_url,
            location,
            timezone,
            retry,
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(
            client,
            config.weather.api_endpoint.clone(),
            config.location.coordinates(),
            config.location.timezone.clone(),
            RetryPolicy::from(&config.http),
        )
    }

    fn query(&self, range: DateRange) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.location.latitude.to_string()),
            ("longitude", self.location.longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("timezone", self.timezone.clone()),
            ("start_date", range.start.to_string()),
            ("end_date", range.end.to_string()),
        ]
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn fetch_weather(&self, range: DateRange) -> Result<WeatherReport, FetchError> {
        let data: OpenMeteoResponse =
            get_json(&self.client, &self.retry, &self.base_url, &self.query(range)).await?;

        data.into_report().map_err(|message| FetchError::Schema {
            url: self.base_url.clone(),
            message,
        })
    }
}

impl OpenMeteoResponse {
    /// Convert the parallel arrays into records, checking that they line up
    pub fn into_report(self) -> Result<WeatherReport, String> {
        let hourly = self.hourly;
        let n = hourly.time.len();
        check_len("hourly.temperature_2m", n, hourly.temperature_2m.len())?;
        check_len("hourly.precipitation", n, hourly.precipitation.len())?;
        check_len("hourly.wind_speed_10m", n, hourly.wind_speed_10m.len())?;
        check_len("hourly.wind_direction_10m", n, hourly.wind_direction_10m.len())?;

        let mut hourly_records = Vec::with_capacity(n);
        for (i, time) in hourly.time.iter().enumerate() {
            let timestamp = NaiveDateTime::parse_from_str(time, HOURLY_TIME_FORMAT)
                .map_err(|e| format!("hourly.time[{}] = {:?}: {}", i, time, e))?;
            hourly_records.push(HourlyWeatherRecord {
                timestamp,
                temperature_celsius: hourly.temperature_2m[i],
                precipitation_mm: hourly.precipitation[i],
                wind_speed: hourly.wind_speed_10m[i],
                wind_direction_deg: hourly.wind_direction_10m[i],
            });
        }

        let daily = self.daily;
        let n = daily.time.len();
        check_len("daily.weather_code", n, daily.weather_code.len())?;
        check_len("daily.temperature_2m_max", n, daily.temperature_2m_max.len())?;
        check_len("daily.temperature_2m_min", n, daily.temperature_2m_min.len())?;
        check_len(
            "daily.precipitation_probability_max",
            n,
            daily.precipitation_probability_max.len(),
        )?;
        check_len(
            "daily.wind_direction_10m_dominant",
            n,
            daily.wind_direction_10m_dominant.len(),
        )?;

        let mut daily_records = Vec::with_capacity(n);
        for (i, time) in daily.time.iter().enumerate() {
            let date = NaiveDate::parse_from_str(time, "%Y-%m-%d")
                .map_err(|e| format!("daily.time[{}] = {:?}: {}", i, time, e))?;
            daily_records.push(DailyWeatherSummary {
                date,
                weather_code: daily.weather_code[i],
                temperature_max: daily.temperature_2m_max[i],
                temperature_min: daily.temperature_2m_min[i],
                precipitation_probability_max: daily.precipitation_probability_max[i],
                dominant_wind_direction: daily.wind_direction_10m_dominant[i],
            });
        }

        Ok(WeatherReport {
            location: GpsCoordinates::new(self.latitude, self.longitude),
            hourly: hourly_records,
            daily: daily_records,
        })
    }
}

fn check_len(field: &str, expected: usize, found: usize) -> Result<(), String> {
    if expected == found {
        Ok(())
    } else {
        Err(format!(
            "{} has {} values but time has {}",
            field, found, expected
        ))
    }
}
