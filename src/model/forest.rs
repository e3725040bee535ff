//! Isolation-forest inference
//!
//! Evaluates a tree ensemble trained offline. Anomalies isolate in few
//! splits, so short average path lengths mean outliers; the decision
//! function is positive for inliers and negative for outliers, matching
//! the convention the tier thresholds were calibrated against.

use serde::{Deserialize, Serialize};

use crate::core::errors::{EngineError, Result};

/// Euler–Mascheroni constant, used by the harmonic-number approximation.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Anything scoring raw decision values for a fixed feature schema.
///
/// Implemented by the isolation forest; tests substitute fixed-output
/// models to pin the normalization law.
pub trait OutlierModel: Send + Sync {
    /// Dimensionality the model was trained on.
    fn n_features(&self) -> usize;

    /// Raw decision value for one already-scaled vector; higher means
    /// more normal.
    fn decision_function(&self, input: &[f64]) -> f64;
}

/// One node of an isolation tree. Nodes are stored flat and reference
/// each other by index, with the root at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Training samples that ended in this leaf.
        n_samples: usize,
    },
}

/// A single isolation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationTree {
    nodes: Vec<TreeNode>,
}

impl IsolationTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Structural checks for one tree: non-empty, split features within
    /// the schema, and child indices in range and strictly past their
    /// parent so traversal always terminates.
    fn validate(&self, tree_index: usize, n_features: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(EngineError::Artifact(format!(
                "tree {} has no nodes",
                tree_index
            )));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= n_features {
                    return Err(EngineError::Artifact(format!(
                        "tree {} node {} splits on feature {} but the schema has {}",
                        tree_index, i, feature, n_features
                    )));
                }
                for child in [*left, *right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(EngineError::Artifact(format!(
                            "tree {} node {} has child index {} outside {}..{}",
                            tree_index,
                            i,
                            child,
                            i + 1,
                            self.nodes.len()
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Path length from the root to the leaf `input` falls into, with the
    /// standard `c(n)` correction for the unexpanded subtree at the leaf.
    fn path_length(&self, input: &[f64]) -> f64 {
        let mut index = 0;
        let mut depth = 0.0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { n_samples } => {
                    return depth + average_path_length(*n_samples);
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = input.get(*feature).copied().unwrap_or(0.0);
                    index = if value <= *threshold { *left } else { *right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` samples,
/// `c(n) = 2 H(n-1) - 2 (n-1)/n`.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Trained isolation forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    /// Subsample size each tree was grown on.
    max_samples: usize,
    /// Decision offset recorded at training time (the contamination
    /// quantile of the training scores, -0.5 for the default setup).
    offset: f64,
    n_features: usize,
}

impl IsolationForest {
    pub fn new(
        trees: Vec<IsolationTree>,
        max_samples: usize,
        offset: f64,
        n_features: usize,
    ) -> Self {
        Self {
            trees,
            max_samples,
            offset,
            n_features,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Structural checks over every tree. Run at artifact load so
    /// scoring never indexes out of range or fails to terminate.
    pub fn validate(&self) -> Result<()> {
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.n_features)?;
        }
        Ok(())
    }
}

impl OutlierModel for IsolationForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn decision_function(&self, input: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let mean_path: f64 = self
            .trees
            .iter()
            .map(|tree| tree.path_length(input))
            .sum::<f64>()
            / self.trees.len() as f64;

        // Anomaly score in (0, 1]: 2^(-E[h] / c(max_samples)). Inliers
        // approach 0.5 from below, isolated points approach 1.
        let normalizer = average_path_length(self.max_samples).max(f64::MIN_POSITIVE);
        let anomaly_score = 2_f64.powf(-mean_path / normalizer);

        -anomaly_score - self.offset
    }
}
