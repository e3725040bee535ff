//! Risk fusion engine
//!
//! Orchestrates one assessment: feature extraction, threat-intel and
//! intent signals, scoring-vector assembly in the artifact's feature
//! order, anomaly scoring, and the final tier/explanation. Provider
//! failures degrade to neutral signals when configured; every other
//! failure surfaces tagged with its stage, never as a fabricated verdict.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::core::config::EngineConfig;
use crate::core::domain::{Transaction, WalletHistory};
use crate::core::errors::{EngineError, Result, Stage};
use crate::core::validation::validate_transaction;
use crate::features::{EnrichmentData, FeatureExtractor, FeatureVector, SimulatedEnrichment};
use crate::intent::{IntentClassifier, IntentLabel, IntentResult};
use crate::model::{AnomalyScorer, ModelStore};
use crate::threat_intel::{ThreatIntelProvider, ThreatIntelResult, ThreatIntelService, NATIVE_TOKEN};

/// Discretized risk bucket over the fused fraud probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

/// Canonical scoring vector: the eleven numeric signals in the exact
/// order the anomaly model was trained on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringVector(Vec<f64>);

impl ScoringVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Final assessment for one transaction. Immutable, not persisted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudVerdict {
    pub tx_id: String,
    /// Fused fraud probability in [0, 1].
    pub fraud_probability: f64,
    pub risk_tier: RiskTier,
    /// Names of the individual signals that exceeded their own concern
    /// thresholds, in a fixed report order.
    pub contributing_signals: Vec<String>,
    /// True when any provider signal was substituted by its neutral
    /// default; the verdict is then partial rather than corroborated.
    pub degraded: bool,
    /// Providers that degraded, empty when `degraded` is false.
    pub degraded_providers: Vec<String>,
}

/// Fuses all signal sources into a fraud verdict.
pub struct RiskFusionEngine {
    extractor: FeatureExtractor,
    threat_intel: Arc<dyn ThreatIntelProvider>,
    intent: IntentClassifier,
    scorer: AnomalyScorer,
    store: Arc<ModelStore>,
    config: EngineConfig,
}

impl RiskFusionEngine {
    pub fn new(
        extractor: FeatureExtractor,
        threat_intel: Arc<dyn ThreatIntelProvider>,
        intent: IntentClassifier,
        store: Arc<ModelStore>,
        config: EngineConfig,
    ) -> Self {
        info!(
            model_loaded = store.is_loaded(),
            timeout_ms = config.providers.timeout_ms,
            "risk fusion engine initialized"
        );
        Self {
            extractor,
            threat_intel,
            intent,
            scorer: AnomalyScorer::new(store.clone()),
            store,
            config,
        }
    }

    /// Engine wired to the simulated providers, for demos and soak tests.
    pub fn simulated(store: Arc<ModelStore>, config: EngineConfig) -> Self {
        Self::new(
            FeatureExtractor::new(Arc::new(SimulatedEnrichment)),
            Arc::new(ThreatIntelService::simulated()),
            IntentClassifier::simulated(),
            store,
            config,
        )
    }

    /// Assess one transaction with optional wallet-history context.
    pub async fn assess(
        &self,
        tx: &Transaction,
        history: Option<&WalletHistory>,
    ) -> Result<FraudVerdict> {
        validate_transaction(tx)?;
        let mut degraded_providers = Vec::new();

        // Stage 1: feature extraction (enrichment is the suspension
        // point).
        let features = match timeout(
            self.config.providers.timeout(),
            self.extractor.extract(tx, history),
        )
        .await
        {
            Ok(Ok(features)) => features,
            Ok(Err(e)) if e.is_recoverable() && self.config.providers.degrade_on_failure => {
                warn!(tx_id = %tx.id, error = %e, "enrichment degraded to neutral defaults");
                degraded_providers.push("enrichment".to_string());
                self.extractor.assemble(tx, history, EnrichmentData::neutral())
            }
            Ok(Err(e)) => return Err(e.at_stage(Stage::FeatureExtraction)),
            Err(_) if self.config.providers.degrade_on_failure => {
                warn!(tx_id = %tx.id, "enrichment timed out, degrading to neutral defaults");
                degraded_providers.push("enrichment".to_string());
                self.extractor.assemble(tx, history, EnrichmentData::neutral())
            }
            Err(_) => {
                return Err(EngineError::ProviderTimeout {
                    provider: "enrichment",
                    timeout_ms: self.config.providers.timeout_ms,
                })
            }
        };

        // Stage 2: threat intel and intent. Neither consumes the other's
        // output, so their relative order is unobservable.
        let threat = match timeout(
            self.config.providers.timeout(),
            self.threat_intel.assess(&tx.recipient, NATIVE_TOKEN),
        )
        .await
        {
            Ok(Ok(threat)) => threat,
            Ok(Err(e)) if e.is_recoverable() && self.config.providers.degrade_on_failure => {
                warn!(tx_id = %tx.id, error = %e, "threat intel degraded to all-clear");
                degraded_providers.push("threat_intel".to_string());
                ThreatIntelResult::neutral()
            }
            Ok(Err(e)) => return Err(e.at_stage(Stage::ThreatIntel)),
            Err(_) if self.config.providers.degrade_on_failure => {
                warn!(tx_id = %tx.id, "threat intel timed out, degrading to all-clear");
                degraded_providers.push("threat_intel".to_string());
                ThreatIntelResult::neutral()
            }
            Err(_) => {
                return Err(EngineError::ProviderTimeout {
                    provider: "threat_intel",
                    timeout_ms: self.config.providers.timeout_ms,
                })
            }
        };

        let intent = self.intent.classify(&tx.sender, &tx.recipient, tx.value);

        // Stage 3: assemble the vector in the artifact's trained order
        // and score it.
        let handle = self.store.current()?;
        let vector = assemble_scoring_vector(
            &handle.feature_names,
            &features,
            threat.threat_score,
            intent.confidence,
        )?;
        let fraud_probability = self
            .scorer
            .score(vector.as_slice())
            .map_err(|e| e.at_stage(Stage::AnomalyScoring))?;

        let risk_tier = self.tier_for(fraud_probability);
        let contributing_signals = self.contributing_signals(&features, &threat, &intent);

        debug!(
            tx_id = %tx.id,
            fraud_probability,
            tier = ?risk_tier,
            degraded = !degraded_providers.is_empty(),
            "assessment complete"
        );

        Ok(FraudVerdict {
            tx_id: tx.id.clone(),
            fraud_probability,
            risk_tier,
            contributing_signals,
            degraded: !degraded_providers.is_empty(),
            degraded_providers,
        })
    }

    fn tier_for(&self, probability: f64) -> RiskTier {
        if probability > self.config.tiers.high {
            RiskTier::High
        } else if probability > self.config.tiers.medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Signals whose own value crossed their concern threshold, reported
    /// in a fixed order for stable explanations.
    fn contributing_signals(
        &self,
        features: &FeatureVector,
        threat: &ThreatIntelResult,
        intent: &IntentResult,
    ) -> Vec<String> {
        let concern = &self.config.concern;
        let mut signals = Vec::new();

        if threat.is_blacklisted {
            signals.push("blacklisted_recipient".to_string());
        }
        if threat.threat_score > concern.threat_score {
            signals.push("threat_score".to_string());
        }
        if threat.token_rugpull_flag {
            signals.push("token_rugpull_flag".to_string());
        }
        if intent.intent == IntentLabel::PhishingSuspected {
            signals.push("phishing_intent".to_string());
        }
        if features.recipient_cluster_risk > concern.cluster_risk {
            signals.push("recipient_cluster_risk".to_string());
        }
        if features.value_to_avg_ratio > concern.value_to_avg_ratio {
            signals.push("value_to_avg_ratio".to_string());
        }
        if features.gas_volatility_score > concern.gas_volatility {
            signals.push("gas_volatility_score".to_string());
        }
        if features.tx_time_deviation >= 1.0 {
            signals.push("tx_time_deviation".to_string());
        }

        signals
    }
}

/// Assemble the scoring vector following the artifact's feature-name
/// list. An unrecognized or repeated name means the deployed model and
/// this build disagree about the schema; that is surfaced as
/// `SchemaMismatch`, never silently reordered.
pub fn assemble_scoring_vector(
    feature_names: &[String],
    features: &FeatureVector,
    threat_score: f64,
    intent_confidence: f64,
) -> Result<ScoringVector> {
    let numeric = features.numeric_fields();
    let mut values = Vec::with_capacity(feature_names.len());
    let mut seen = HashSet::new();

    for name in feature_names {
        if !seen.insert(name.as_str()) {
            return Err(EngineError::SchemaMismatch(format!(
                "feature '{}' appears more than once in the model schema",
                name
            )));
        }
        let value = match name.as_str() {
            "threat_score" => threat_score,
            "intent_confidence" => intent_confidence,
            other => numeric
                .iter()
                .find(|(n, _)| *n == other)
                .map(|(_, v)| *v)
                .ok_or_else(|| {
                    EngineError::SchemaMismatch(format!(
                        "model artifact names unknown feature '{}'",
                        other
                    ))
                })?,
        };
        values.push(value);
    }

    Ok(ScoringVector(values))
}

/// The feature order this build was written against; artifacts are
/// expected to carry exactly this list.
pub const CANONICAL_FEATURE_NAMES: [&str; 11] = [
    "wallet_age_days",
    "recipient_age_days",
    "value_to_avg_ratio",
    "interaction_frequency",
    "recipient_token_hygiene",
    "contract_code_similarity_score",
    "gas_volatility_score",
    "tx_time_deviation",
    "recipient_cluster_risk",
    "threat_score",
    "intent_confidence",
];
