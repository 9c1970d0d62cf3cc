//! Error handling for the bakuwaki forecast service
//!
//! Provides consistent error responses in English and Japanese

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::FeatureError;
use thiserror::Error;

use crate::external::FetchError;
use crate::ml::ArtifactError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // External service errors
    #[error("Weather fetch failed: {0}")]
    WeatherFetch(#[from] FetchError),

    // Feature construction
    #[error("Feature construction failed: {0}")]
    Feature(#[from] FeatureError),

    #[error("Consistency error: {0}")]
    Consistency(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ArtifactError> for AppError {
    fn from(err: ArtifactError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_ja: String,
}

impl AppError {
    fn detail(&self) -> ErrorDetail {
        match self {
            AppError::WeatherFetch(err) => ErrorDetail {
                code: "WEATHER_FETCH_FAILED".to_string(),
                message_en: format!("Failed to fetch weather data: {}", err),
                message_ja: "気象データの取得に失敗しました".to_string(),
            },
            AppError::Feature(err) => ErrorDetail {
                code: "FEATURE_ERROR".to_string(),
                message_en: format!("Failed to build model features: {}", err),
                message_ja: "特徴量の作成に失敗しました".to_string(),
            },
            AppError::Consistency(msg) => ErrorDetail {
                code: "CONSISTENCY_ERROR".to_string(),
                message_en: msg.clone(),
                message_ja: "内部データの整合性エラーが発生しました".to_string(),
            },
            AppError::Configuration(msg) => ErrorDetail {
                code: "CONFIGURATION_ERROR".to_string(),
                message_en: format!("Configuration error: {}", msg),
                message_ja: "設定エラーが発生しました".to_string(),
            },
            AppError::Internal(msg) => ErrorDetail {
                code: "INTERNAL_ERROR".to_string(),
                message_en: msg.clone(),
                message_ja: "サーバー内部でエラーが発生しました".to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_detail = self.detail();

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: error_detail,
            }),
        )
            .into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_every_error_is_internal_server_error() {
        let errors = vec![
            AppError::WeatherFetch(FetchError::Schema {
                url: "http://weather".into(),
                message: "missing hourly".into(),
            }),
            AppError::Feature(FeatureError::MissingColumn("moon_age".into())),
            AppError::Consistency("no daily summary".into()),
            AppError::Configuration("bad".into()),
            AppError::Internal("boom".into()),
        ];
        for err in errors {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn test_detail_codes() {
        let err = AppError::WeatherFetch(FetchError::NotFound {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        });
        let detail = err.detail();
        assert_eq!(detail.code, "WEATHER_FETCH_FAILED");
        assert!(detail.message_en.contains("2024-03-01"));
    }
}
