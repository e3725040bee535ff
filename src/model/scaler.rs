//! Feature standardization
//!
//! Standard scaler fitted offline at training time. Only the fitted
//! parameters travel with the artifact; the engine never refits.

use serde::{Deserialize, Serialize};

use crate::core::errors::{EngineError, Result};

/// Per-feature standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Build from fitted parameters. Fails if the arrays disagree or a
    /// scale entry is zero/non-finite.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if mean.len() != scale.len() {
            return Err(EngineError::SchemaMismatch(format!(
                "scaler mean has {} entries but scale has {}",
                mean.len(),
                scale.len()
            )));
        }
        if scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(EngineError::Artifact(
                "scaler contains a zero or non-finite scale entry".to_string(),
            ));
        }
        Ok(Self { mean, scale })
    }

    /// Identity scaler, useful for synthetic artifacts in tests.
    pub fn identity(n_features: usize) -> Self {
        Self {
            mean: vec![0.0; n_features],
            scale: vec![1.0; n_features],
        }
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Apply the fitted transform. Dimensionality disagreement is a
    /// contract violation, never a silent coercion.
    pub fn transform(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.mean.len() {
            return Err(EngineError::SchemaMismatch(format!(
                "scoring vector has {} dimensions, scaler was fitted on {}",
                input.len(),
                self.mean.len()
            )));
        }
        Ok(input
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = StandardScaler::new(vec![1.0, 10.0], vec![2.0, 5.0]).unwrap();
        let out = scaler.transform(&[3.0, 0.0]).unwrap();
        assert_eq!(out, vec![1.0, -2.0]);
    }

    #[test]
    fn test_identity_scaler() {
        let scaler = StandardScaler::identity(3);
        let out = scaler.transform(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(out, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_dimension_mismatch_is_schema_error() {
        let scaler = StandardScaler::identity(11);
        let err = scaler.transform(&[0.0; 9]).unwrap_err();
        assert!(matches!(err, EngineError::SchemaMismatch(_)));
    }

    #[test]
    fn test_zero_scale_rejected() {
        assert!(StandardScaler::new(vec![0.0], vec![0.0]).is_err());
    }

    #[test]
    fn test_mismatched_parameter_arrays_rejected() {
        assert!(StandardScaler::new(vec![0.0, 0.0], vec![1.0]).is_err());
    }
}
