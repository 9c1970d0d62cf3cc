//! Service startup tests
//!
//! Builds `AppState` from configuration the way the server binary does and
//! checks that unusable settings surface as configuration errors.

use std::fs;
use std::path::Path;

use bakuwaki_forecast_backend::{
    ml::{FEATURES_FILE, LABEL_ENCODER_FILE, MODEL_FILE, SCALER_X_FILE, SCALER_Y_FILE},
    AppError, AppState, Config,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write(dir: &Path, file: &str, value: Value) {
    fs::write(dir.join(file), serde_json::to_vec(&value).unwrap()).unwrap();
}

fn model_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), FEATURES_FILE, json!(["moon_age"]));
    write(
        dir.path(),
        MODEL_FILE,
        json!({ "base_score": 0.0, "trees": [{ "nodes": [{ "leaf": 1.0 }] }] }),
    );
    write(dir.path(), SCALER_X_FILE, json!({ "mean": [15.0], "scale": [8.0] }));
    write(dir.path(), SCALER_Y_FILE, json!({ "mean": [3.0], "scale": [1.5] }));
    write(dir.path(), LABEL_ENCODER_FILE, json!({ "classes": [0, 4, 8, 12] }));
    dir
}

fn config(model_dir: &Path, holiday_country: &str) -> Config {
    serde_json::from_value(json!({
        "environment": "test",
        "server": { "host": "127.0.0.1", "port": 0 },
        "cors": { "allowed_origins": [] },
        "location": {
            "latitude": 36.6959,
            "longitude": 137.2136,
            "timezone": "Asia/Tokyo",
            "utc_offset_hours": 9,
            "holiday_country": holiday_country
        },
        "weather": { "api_endpoint": "http://127.0.0.1:9/weather" },
        "tide": { "api_endpoint": "http://127.0.0.1:9/tide", "prefecture_code": 16, "harbor_code": 3 },
        "http": { "timeout_secs": 1, "max_attempts": 1, "initial_backoff_ms": 1 },
        "model": { "dir": model_dir },
        "prediction": { "default_moon_age": 15.0 }
    }))
    .unwrap()
}

#[test]
fn test_state_from_valid_config() {
    let dir = model_dir();
    let state = AppState::from_config(&config(dir.path(), "JP"), reqwest::Client::new());
    assert!(state.is_ok());
}

#[test]
fn test_missing_artifacts_are_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppState::from_config(&config(dir.path(), "JP"), reqwest::Client::new())
        .err()
        .unwrap();

    match err {
        AppError::Configuration(message) => assert!(message.contains(FEATURES_FILE)),
        other => panic!("expected Configuration, got {:?}", other),
    }
}

#[test]
fn test_unknown_holiday_country_is_configuration_error() {
    let dir = model_dir();
    let err = AppState::from_config(&config(dir.path(), "XX"), reqwest::Client::new())
        .err()
        .unwrap();

    match err {
        AppError::Configuration(message) => assert!(message.contains("XX")),
        other => panic!("expected Configuration, got {:?}", other),
    }
}
