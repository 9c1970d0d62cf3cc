//! Shared types and feature engineering for the bakuwaki forecast service
//!
//! Everything here is synchronous and free of I/O: weather models, the
//! compass-direction codec, the holiday calendar and the feature pipeline
//! that turns hourly weather into model-ready rows.

pub mod direction;
pub mod error;
pub mod features;
pub mod holidays;
pub mod models;
pub mod types;
pub mod validation;

pub use direction::*;
pub use error::*;
pub use features::*;
pub use holidays::*;
pub use models::*;
pub use types::*;
pub use validation::*;
