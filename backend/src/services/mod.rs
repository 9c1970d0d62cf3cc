//! Business logic services for the bakuwaki forecast service

pub mod prediction;

pub use prediction::{PredictionService, PredictionSettings};
