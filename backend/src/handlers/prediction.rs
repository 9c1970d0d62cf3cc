//! HTTP handlers for prediction endpoints

use axum::{extract::State, Json};
use shared::PredictionRecord;

use crate::error::AppResult;
use crate::AppState;

/// Predicted amounts for today through today+6
pub async fn predict_week(State(state): State<AppState>) -> AppResult<Json<Vec<PredictionRecord>>> {
    let predictions = state.prediction.predict_week().await?;
    Ok(Json(predictions))
}
