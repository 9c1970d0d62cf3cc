//! Configuration management for the bakuwaki forecast service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with BAKUWAKI__ prefix

use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{calendar_for_country, GpsCoordinates};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Cross-origin settings for the web frontend
    pub cors: CorsConfig,

    /// Forecast location
    pub location: LocationConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Lunar-age (tide) API configuration
    pub tide: TideConfig,

    /// Outbound HTTP behaviour shared by both providers
    pub http: HttpConfig,

    /// Trained artifacts
    pub model: ModelConfig,

    pub prediction: PredictionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,

    /// IANA timezone name sent to the weather API
    pub timezone: String,

    /// Offset used to decide what "today" is
    pub utc_offset_hours: i32,

    /// ISO country code of the holiday calendar
    pub holiday_country: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TideConfig {
    /// Tide API endpoint
    pub api_endpoint: String,

    /// Prefecture code (`pc`)
    pub prefecture_code: u32,

    /// Harbor code (`hc`)
    pub harbor_code: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Per-attempt request timeout in seconds
    pub timeout_secs: u64,

    /// Total attempts per fetch, including the first
    pub max_attempts: u32,

    /// Delay before the second attempt; doubles after each failure
    pub initial_backoff_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Directory holding the five trained artifact files
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionConfig {
    /// Lunar age used when the tide API has no answer for a date
    pub default_moon_age: f64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("BAKUWAKI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default(
                "cors.allowed_origins",
                vec!["http://localhost:3001", "https://bakuwaki-yoho.com"],
            )?
            .set_default("location.latitude", 36.6959)?
            .set_default("location.longitude", 137.2136)?
            .set_default("location.timezone", "Asia/Tokyo")?
            .set_default("location.utc_offset_hours", 9)?
            .set_default("location.holiday_country", "JP")?
            .set_default("weather.api_endpoint", "https://api.open-meteo.com/v1/forecast")?
            .set_default("tide.api_endpoint", "https://tide736.net/api/get_tide.php")?
            .set_default("tide.prefecture_code", 16)?
            .set_default("tide.harbor_code", 3)?
            .set_default("http.timeout_secs", 10)?
            .set_default("http.max_attempts", 3)?
            .set_default("http.initial_backoff_ms", 1000)?
            .set_default("model.dir", "ml/models")?
            .set_default("prediction.default_moon_age", 15.0)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BAKUWAKI prefix)
            .add_source(
                Environment::with_prefix("BAKUWAKI")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.max_attempts == 0 {
            return Err(ConfigError::Message(
                "http.max_attempts must be at least 1".into(),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "http.timeout_secs must be positive".into(),
            ));
        }
        if !(-12..=14).contains(&self.location.utc_offset_hours) {
            return Err(ConfigError::Message(
                "location.utc_offset_hours must be between -12 and 14".into(),
            ));
        }
        if calendar_for_country(&self.location.holiday_country).is_none() {
            return Err(ConfigError::Message(format!(
                "no holiday calendar for location.holiday_country {}",
                self.location.holiday_country
            )));
        }
        if !self.prediction.default_moon_age.is_finite() {
            return Err(ConfigError::Message(
                "prediction.default_moon_age must be a number".into(),
            ));
        }
        Ok(())
    }
}

impl LocationConfig {
    pub fn coordinates(&self) -> GpsCoordinates {
        GpsCoordinates::new(self.latitude, self.longitude)
    }

    pub fn utc_offset(&self) -> FixedOffset {
        // validate() keeps the offset in range
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}
