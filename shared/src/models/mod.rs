//! Domain models for the forecast service

mod features;
mod prediction;
mod weather;

pub use features::*;
pub use prediction::*;
pub use weather::*;
