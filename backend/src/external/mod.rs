//! External API integrations

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{DateRange, WeatherReport};

pub mod http;
pub mod tide;
pub mod weather;

pub use http::{get_json, FetchError, RetryPolicy};
pub use tide::TideClient;
pub use weather::OpenMeteoClient;

/// Hourly and daily weather for a range of dates
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_weather(&self, range: DateRange) -> Result<WeatherReport, FetchError>;
}

/// Lunar age (days since new moon) for a single date
#[async_trait]
pub trait LunarAgeSource: Send + Sync {
    async fn fetch_moon_age(&self, date: NaiveDate) -> Result<f64, FetchError>;
}
