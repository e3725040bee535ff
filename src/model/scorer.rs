//! Anomaly scorer
//!
//! Scales a scoring vector with the fitted scaler, runs the outlier
//! model, and maps the raw decision value to a fraud probability with the
//! fixed affine-then-clamp law the tier thresholds were calibrated
//! against:
//!
//! ```text
//! fraud_probability = clamp(1 - (d + 0.5), 0, 1)
//! ```
//!
//! The law is preserved exactly for compatibility; the pre-clamp value
//! can leave [0, 1] for strongly normal or abnormal inputs, which the
//! clamp absorbs.

use std::sync::Arc;
use tracing::debug;

use super::artifact::ModelStore;
use crate::core::errors::Result;

/// Converts raw anomaly decisions into fraud probabilities.
pub struct AnomalyScorer {
    store: Arc<ModelStore>,
}

impl AnomalyScorer {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self { store }
    }

    /// Score one assembled vector.
    ///
    /// Fails with `ModelNotLoaded` before a model/scaler pair is bound
    /// and with `SchemaMismatch` when the vector's dimensionality
    /// disagrees with the fitted scaler.
    pub fn score(&self, vector: &[f64]) -> Result<f64> {
        let handle = self.store.current()?;
        let scaled = handle.scaler.transform(vector)?;
        let decision = handle.model.decision_function(&scaled);
        let probability = normalize_decision(decision);
        debug!(
            raw_decision = decision,
            fraud_probability = probability,
            "anomaly model scored vector"
        );
        Ok(probability)
    }
}

/// The exact normalization law. Higher decision values mean "more
/// normal", so the probability moves inversely.
pub fn normalize_decision(decision: f64) -> f64 {
    (1.0 - (decision + 0.5)).clamp(0.0, 1.0)
}
