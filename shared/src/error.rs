//! Errors raised while assembling and engineering feature tables

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeatureError {
    #[error("Column '{0}' already exists in the feature table")]
    DuplicateColumn(String),

    #[error("Required column '{0}' not found in the feature table")]
    MissingColumn(String),

    #[error("Column '{column}' has {found} values but the table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Hourly weather records are not sorted by timestamp (index {index})")]
    UnsortedHourly { index: usize },

    #[error("Label vocabulary is empty")]
    EmptyVocabulary,
}
