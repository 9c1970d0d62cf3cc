//! Loading the trained artifacts from the model directory

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use shared::CategoryEncoder;
use thiserror::Error;

use super::label_encoder::LabelEncoder;
use super::model::{Regressor, TreeEnsemble};
use super::scaler::{Scaler, StandardScaler};

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_X_FILE: &str = "scaler_x.json";
pub const SCALER_Y_FILE: &str = "scaler_y.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const FEATURES_FILE: &str = "features.json";

/// Artifact could not be used; the service refuses to start
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid artifact {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// The five trained components, immutable after loading
#[derive(Clone)]
pub struct TrainedArtifacts {
    pub model: Arc<dyn Regressor>,
    pub scaler_x: Arc<dyn Scaler>,
    pub scaler_y: Arc<dyn Scaler>,
    pub label_encoder: Arc<dyn CategoryEncoder>,
    /// Model input columns, in the order the model expects
    pub features: Vec<String>,
}

impl TrainedArtifacts {
    /// Load and cross-check every artifact under `dir`
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let features: Vec<String> = read_json(&dir.join(FEATURES_FILE))?;
        let model: TreeEnsemble = read_json(&dir.join(MODEL_FILE))?;
        let scaler_x: StandardScaler = read_json(&dir.join(SCALER_X_FILE))?;
        let scaler_y: StandardScaler = read_json(&dir.join(SCALER_Y_FILE))?;
        let label_encoder: LabelEncoder = read_json(&dir.join(LABEL_ENCODER_FILE))?;

        let invalid = |file: &str, message: String| ArtifactError::Invalid {
            path: dir.join(file),
            message,
        };

        scaler_x.validate().map_err(|m| invalid(SCALER_X_FILE, m))?;
        scaler_y.validate().map_err(|m| invalid(SCALER_Y_FILE, m))?;
        label_encoder
            .validate()
            .map_err(|m| invalid(LABEL_ENCODER_FILE, m))?;
        model
            .validate(features.len())
            .map_err(|m| invalid(MODEL_FILE, m))?;

        Self::from_parts(
            Arc::new(model),
            Arc::new(scaler_x),
            Arc::new(scaler_y),
            Arc::new(label_encoder),
            features,
        )
        .map_err(|message| invalid(FEATURES_FILE, message))
    }

    /// Assemble artifacts from already-built components, checking that their
    /// shapes agree with the feature list
    pub fn from_parts(
        model: Arc<dyn Regressor>,
        scaler_x: Arc<dyn Scaler>,
        scaler_y: Arc<dyn Scaler>,
        label_encoder: Arc<dyn CategoryEncoder>,
        features: Vec<String>,
    ) -> Result<Self, String> {
        if features.is_empty() {
            return Err("feature list is empty".to_string());
        }
        let mut seen = HashSet::new();
        if let Some(dup) = features.iter().find(|f| !seen.insert(f.as_str())) {
            return Err(format!("feature {:?} listed twice", dup));
        }
        if scaler_x.width() != features.len() {
            return Err(format!(
                "{} features but the input scaler has {} columns",
                features.len(),
                scaler_x.width()
            ));
        }
        if scaler_y.width() != 1 {
            return Err(format!(
                "output scaler must have 1 column, found {}",
                scaler_y.width()
            ));
        }
        if label_encoder.classes().is_empty() {
            return Err("label encoder has no classes".to_string());
        }

        Ok(Self {
            model,
            scaler_x,
            scaler_y,
            label_encoder,
            features,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let text = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
