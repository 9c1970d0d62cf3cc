//! Standard (z-score) scaling for model inputs and outputs

use serde::{Deserialize, Serialize};

pub trait Scaler: Send + Sync {
    /// Number of columns the scaler was fit on
    fn width(&self) -> usize;

    fn transform(&self, row: &[f64]) -> Vec<f64>;

    fn inverse_transform(&self, row: &[f64]) -> Vec<f64>;
}

/// Per-column mean and scale. A zero scale (constant training column) acts as 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} columns but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.is_empty() {
            return Err("scaler has no columns".to_string());
        }
        if self
            .mean
            .iter()
            .chain(&self.scale)
            .any(|v| !v.is_finite())
        {
            return Err("scaler parameters must be finite".to_string());
        }
        Ok(())
    }

    fn effective_scale(&self, column: usize) -> f64 {
        match self.scale[column] {
            s if s == 0.0 => 1.0,
            s => s,
        }
    }
}

impl Scaler for StandardScaler {
    fn width(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.mean)
            .enumerate()
            .map(|(i, (x, mean))| (x - mean) / self.effective_scale(i))
            .collect()
    }

    fn inverse_transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.mean)
            .enumerate()
            .map(|(i, (x, mean))| x * self.effective_scale(i) + mean)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_and_inverse() {
        let scaler = StandardScaler::new(vec![10.0, 0.0], vec![2.0, 0.0]);
        assert_eq!(scaler.transform(&[14.0, 3.0]), vec![2.0, 3.0]);
        assert_eq!(scaler.inverse_transform(&[2.0, 3.0]), vec![14.0, 3.0]);
    }

    #[test]
    fn test_validation() {
        assert!(StandardScaler::new(vec![1.0], vec![1.0]).validate().is_ok());
        assert!(StandardScaler::new(vec![1.0, 2.0], vec![1.0]).validate().is_err());
        assert!(StandardScaler::new(vec![], vec![]).validate().is_err());
        assert!(StandardScaler::new(vec![f64::NAN], vec![1.0]).validate().is_err());
    }
}
