//! Wind-direction label encoder

use serde::{Deserialize, Serialize};
use shared::CategoryEncoder;

/// Sorted, de-duplicated class list; a class encodes to its position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<i64>,
}

impl LabelEncoder {
    pub fn new(mut classes: Vec<i64>) -> Self {
        classes.sort_unstable();
        classes.dedup();
        Self { classes }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("label encoder has no classes".to_string());
        }
        if self.classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err("label encoder classes must be sorted and unique".to_string());
        }
        Ok(())
    }
}

impl CategoryEncoder for LabelEncoder {
    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn encode(&self, value: i64) -> Option<usize> {
        self.classes.binary_search(&value).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_position_in_sorted_classes() {
        let encoder = LabelEncoder::new(vec![12, 0, 4, 4]);
        assert_eq!(encoder.classes(), &[0, 4, 12]);
        assert_eq!(encoder.encode(12), Some(2));
        assert_eq!(encoder.encode(5), None);
    }

    #[test]
    fn test_unsorted_file_fails_validation() {
        let encoder: LabelEncoder = serde_json::from_str(r#"{"classes": [3, 1]}"#).unwrap();
        assert!(encoder.validate().is_err());
        let empty: LabelEncoder = serde_json::from_str(r#"{"classes": []}"#).unwrap();
        assert!(empty.validate().is_err());
    }
}
