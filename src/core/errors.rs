//! Error types for risk assessment
//!
//! One error enum covers the whole pipeline so callers match on a single
//! type; variants carry enough structure to tell deployment bugs apart
//! from per-transaction rejections.

use thiserror::Error;

/// Pipeline stage an assessment failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Feature extraction over the transaction + wallet history.
    FeatureExtraction,
    /// Threat-intelligence lookup on the recipient/token.
    ThreatIntel,
    /// Heuristic intent classification.
    IntentClassification,
    /// Scaler transform + anomaly model inference.
    AnomalyScoring,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::FeatureExtraction => "feature_extraction",
            Stage::ThreatIntel => "threat_intel",
            Stage::IntentClassification => "intent_classification",
            Stage::AnomalyScoring => "anomaly_scoring",
        };
        write!(f, "{}", name)
    }
}

/// Risk-engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed transaction input. Rejected immediately, never retried.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Scoring vector disagrees with the fitted model schema. Indicates a
    /// deployment/versioning bug, not bad input.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Engine invoked before a model/scaler pair was bound.
    #[error("Anomaly model not loaded")]
    ModelNotLoaded,

    /// An external provider did not answer within its deadline.
    #[error("Provider '{provider}' timed out after {timeout_ms}ms")]
    ProviderTimeout { provider: &'static str, timeout_ms: u64 },

    /// An external provider answered with an error.
    #[error("Provider '{provider}' unavailable: {message}")]
    ProviderUnavailable { provider: &'static str, message: String },

    /// Model artifact could not be read or parsed.
    #[error("Model artifact error: {0}")]
    Artifact(String),

    /// Any other failure, tagged with the stage it came from.
    #[error("Assessment failed at {stage}: {cause}")]
    AssessmentFailed { stage: Stage, cause: String },

    /// IO error (artifact load).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Whether the engine may degrade to a neutral signal and continue.
    ///
    /// Only provider failures are recoverable; everything else aborts the
    /// assessment.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ProviderTimeout { .. } | Self::ProviderUnavailable { .. }
        )
    }

    /// Tag any error with the pipeline stage it surfaced in.
    pub fn at_stage(self, stage: Stage) -> Self {
        match self {
            // Already tagged or self-describing.
            Self::AssessmentFailed { .. }
            | Self::InvalidTransaction(_)
            | Self::SchemaMismatch(_)
            | Self::ModelNotLoaded
            | Self::ProviderTimeout { .. }
            | Self::ProviderUnavailable { .. } => self,
            other => Self::AssessmentFailed {
                stage,
                cause: other.to_string(),
            },
        }
    }
}
