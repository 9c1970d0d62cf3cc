//! Gradient-boosted regression trees exported as JSON

use serde::{Deserialize, Serialize};

/// Scores one scaled feature row
pub trait Regressor: Send + Sync {
    fn predict(&self, row: &[f64]) -> f64;
}

/// One node of a regression tree.
///
/// Splits send `x <= threshold` to `left`; a NaN input follows `default_left`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default)]
        default_left: bool,
    },
    Leaf {
        leaf: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl Tree {
    /// Children must point forward so every walk from the root ends at a leaf
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                threshold,
                ..
            } = node
            {
                if *feature >= n_features {
                    return Err(format!(
                        "node {} splits on feature {} but the model has {} features",
                        i, feature, n_features
                    ));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {} has a non-finite threshold", i));
                }
                for child in [left, right] {
                    if *child <= i || *child >= self.nodes.len() {
                        return Err(format!("node {} has invalid child {}", i, child));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_value(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { leaf }) => return *leaf,
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                }) => {
                    let x = row.get(*feature).copied().unwrap_or(f64::NAN);
                    let go_left = if x.is_nan() {
                        *default_left
                    } else {
                        x <= *threshold
                    };
                    index = if go_left { *left } else { *right };
                }
                // unreachable after validate()
                None => return 0.0,
            }
        }
    }
}

impl TreeEnsemble {
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if !self.base_score.is_finite() {
            return Err("base_score must be finite".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }
}

impl Regressor for TreeEnsemble {
    fn predict(&self, row: &[f64]) -> f64 {
        self.base_score + self.trees.iter().map(|t| t.leaf_value(row)).sum::<f64>()
    }
}
