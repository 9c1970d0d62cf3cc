//! Trained model artifacts and inference

mod artifacts;
mod label_encoder;
mod model;
mod scaler;

pub use artifacts::*;
pub use label_encoder::LabelEncoder;
pub use model::{Regressor, Tree, TreeEnsemble, TreeNode};
pub use scaler::{Scaler, StandardScaler};
