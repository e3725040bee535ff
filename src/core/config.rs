//! Engine configuration
//!
//! Thresholds and timeouts for the fusion pipeline. The tier cutoffs are a
//! contract shared with the trained model; change them only together with a
//! retrained artifact.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Risk-tier cutoffs over the fused fraud probability.
    pub tiers: TierThresholds,

    /// Per-signal concern thresholds used for explainability.
    pub concern: ConcernThresholds,

    /// External provider behavior.
    pub providers: ProviderConfig,
}

/// Fraud-probability cutoffs mapping to risk tiers.
///
/// `probability > high` is high risk, `probability > medium` is medium,
/// anything else low.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierThresholds {
    pub medium: f64,
    pub high: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            medium: 0.4,
            high: 0.7,
        }
    }
}

/// Per-signal thresholds above which a signal is reported as a contributor
/// to the verdict. These do not influence the fused probability, only the
/// explanation attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcernThresholds {
    /// Weighted threat score considered concerning.
    pub threat_score: f64,
    /// Recipient cluster-risk score considered concerning.
    pub cluster_risk: f64,
    /// Value-to-average ratio considered concerning.
    pub value_to_avg_ratio: f64,
    /// Gas volatility considered concerning.
    pub gas_volatility: f64,
}

impl Default for ConcernThresholds {
    fn default() -> Self {
        Self {
            threat_score: 0.5,
            cluster_risk: 0.8,
            value_to_avg_ratio: 10.0,
            gas_volatility: 1.0,
        }
    }
}

/// Behavior of the external collaborator calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Deadline for each provider call, in milliseconds.
    pub timeout_ms: u64,

    /// On provider timeout/unavailability, substitute the documented
    /// neutral signal and mark the verdict degraded instead of failing the
    /// assessment.
    pub degrade_on_failure: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 3_000,
            degrade_on_failure: true,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tier_thresholds() {
        let config = EngineConfig::default();
        assert_eq!(config.tiers.medium, 0.4);
        assert_eq!(config.tiers.high, 0.7);
    }

    #[test]
    fn test_default_provider_config() {
        let config = ProviderConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(3_000));
        assert!(config.degrade_on_failure);
    }
}
