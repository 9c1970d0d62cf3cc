//! Bakuwaki forecast backend
//!
//! Predicts the daily firefly-squid amount for Toyama Bay over the coming
//! week from weather forecasts and lunar age.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod ml;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};

use external::{OpenMeteoClient, TideClient};
use ml::TrainedArtifacts;
use services::{PredictionService, PredictionSettings};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub prediction: Arc<PredictionService>,
}

impl AppState {
    pub fn new(prediction: PredictionService) -> Self {
        Self {
            prediction: Arc::new(prediction),
        }
    }

    /// Load the trained artifacts and wire both API clients onto `http_client`.
    /// Any failure here means the service cannot serve.
    pub fn from_config(config: &Config, http_client: reqwest::Client) -> AppResult<Self> {
        tracing::info!("Loading trained artifacts from {}", config.model.dir.display());
        let artifacts = TrainedArtifacts::load(&config.model.dir)?;
        tracing::info!("Model expects {} features", artifacts.features.len());

        let calendar = shared::calendar_for_country(&config.location.holiday_country)
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "no holiday calendar for {}",
                    config.location.holiday_country
                ))
            })?;

        let prediction = PredictionService::new(
            artifacts,
            Arc::new(OpenMeteoClient::from_config(http_client.clone(), config)),
            Arc::new(TideClient::from_config(http_client, config)),
            calendar,
            PredictionSettings::from(config),
        )?;

        Ok(Self::new(prediction))
    }
}
