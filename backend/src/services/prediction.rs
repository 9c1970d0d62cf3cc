//! Weekly prediction service
//!
//! Fetches weather and lunar age for a 10-day window, turns it into one
//! feature row per day and scores the middle 7 rows with the trained model.

use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Utc};
use futures::future::join_all;
use shared::{
    DailyFeatureBuilder, DateRange, FeatureEngineer, FeatureError, FeatureTable, HolidayCalendar,
    PredictionRecord,
};
use tracing::Level;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::{LunarAgeSource, WeatherSource};
use crate::ml::TrainedArtifacts;

/// Days fetched before today so the first predicted row has lag values
pub const LEAD_DAYS: usize = 2;

/// Number of predicted days, starting today
pub const PREDICTION_DAYS: usize = 7;

/// Days fetched after the last predicted day
pub const TRAIL_DAYS: usize = 1;

#[derive(Debug, Clone, Copy)]
pub struct PredictionSettings {
    /// Offset that decides the local calendar date of "today"
    pub utc_offset: FixedOffset,
    /// Lunar age used when the tide API has no answer
    pub default_moon_age: f64,
}

impl From<&Config> for PredictionSettings {
    fn from(config: &Config) -> Self {
        Self {
            utc_offset: config.location.utc_offset(),
            default_moon_age: config.prediction.default_moon_age,
        }
    }
}

/// Weekly prediction pipeline. Holds only read-only state and is shared
/// across requests behind an `Arc`.
pub struct PredictionService {
    artifacts: TrainedArtifacts,
    weather: Arc<dyn WeatherSource>,
    lunar: Arc<dyn LunarAgeSource>,
    builder: DailyFeatureBuilder,
    engineer: FeatureEngineer,
    settings: PredictionSettings,
}

impl PredictionService {
    pub fn new(
        artifacts: TrainedArtifacts,
        weather: Arc<dyn WeatherSource>,
        lunar: Arc<dyn LunarAgeSource>,
        calendar: Box<dyn HolidayCalendar>,
        settings: PredictionSettings,
    ) -> Result<Self, FeatureError> {
        let engineer = FeatureEngineer::new(
            artifacts.label_encoder.clone(),
            artifacts.features.clone(),
        )?;

        Ok(Self {
            artifacts,
            weather,
            lunar,
            builder: DailyFeatureBuilder::new(calendar),
            engineer,
            settings,
        })
    }

    /// Local calendar date at the forecast location
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.settings.utc_offset).date_naive()
    }

    /// Fetch window for predictions starting at `today`
    pub fn fetch_window(today: NaiveDate) -> DateRange {
        DateRange::around(
            today,
            LEAD_DAYS as i64,
            (PREDICTION_DAYS - 1 + TRAIL_DAYS) as i64,
        )
    }

    /// Predict today through today+6
    pub async fn predict_week(&self) -> AppResult<Vec<PredictionRecord>> {
        self.predict_week_from(self.today()).await
    }

    pub async fn predict_week_from(&self, today: NaiveDate) -> AppResult<Vec<PredictionRecord>> {
        let window = Self::fetch_window(today);
        let dates: Vec<NaiveDate> = window.days().collect();

        let report = self.weather.fetch_weather(window).await?;
        let hourly = report.observations();

        let moon_ages = self.moon_ages(&dates).await;

        let records = dates
            .iter()
            .zip(&moon_ages)
            .map(|(date, moon_age)| self.builder.build(*date, &hourly, *moon_age))
            .collect::<Result<Vec<_>, _>>()?;

        let mut table = FeatureTable::from_records(&records);
        table.fill_gaps();
        self.engineer.engineer(&mut table)?;

        let rows = table.slice_rows(LEAD_DAYS..LEAD_DAYS + PREDICTION_DAYS);
        if rows.len() != PREDICTION_DAYS {
            return Err(AppError::Consistency(format!(
                "expected {} rows to predict, found {}",
                PREDICTION_DAYS,
                rows.len()
            )));
        }
        let matrix = rows.select(self.artifacts.features.as_slice())?;

        if tracing::enabled!(Level::DEBUG) {
            let json = serde_json::to_string_pretty(&matrix.to_json_records())
                .unwrap_or_default();
            tracing::debug!("Model input before scaling:\n{}", json);
        }

        let mut predictions = Vec::with_capacity(PREDICTION_DAYS);
        for (i, features) in matrix.zero_filled().iter().enumerate() {
            let date = matrix.dates[i];
            let amount = self.infer(features)?;
            let moon_age = rows
                .value(i, "moon_age")
                .unwrap_or(self.settings.default_moon_age);
            let daily = report.daily_for(date).ok_or_else(|| {
                AppError::Consistency(format!("no daily weather summary for {}", date))
            })?;
            predictions.push(PredictionRecord::new(amount, moon_age, daily));
        }

        tracing::info!(
            start = %today,
            days = predictions.len(),
            "Weekly prediction complete"
        );

        Ok(predictions)
    }

    /// Scale, score and inverse-scale one row
    fn infer(&self, features: &[f64]) -> AppResult<f64> {
        let scaled = self.artifacts.scaler_x.transform(features);
        let raw = self.artifacts.model.predict(&scaled);
        self.artifacts
            .scaler_y
            .inverse_transform(&[raw])
            .first()
            .copied()
            .ok_or_else(|| AppError::Internal("output scaler returned no value".to_string()))
    }

    /// Lunar age per date, fetched concurrently; failures fall back to the default
    async fn moon_ages(&self, dates: &[NaiveDate]) -> Vec<f64> {
        let fetches = dates.iter().map(|date| self.lunar.fetch_moon_age(*date));

        join_all(fetches)
            .await
            .into_iter()
            .zip(dates)
            .map(|(result, date)| match result {
                Ok(age) => age,
                Err(err) => {
                    tracing::warn!(
                        %date,
                        error = %err,
                        default = self.settings.default_moon_age,
                        "Lunar age unavailable, using default"
                    );
                    self.settings.default_moon_age
                }
            })
            .collect()
    }
}
