//! Transaction feature extraction
//!
//! Derives the fixed-schema feature vector consumed by the fusion engine.
//! Behavioral fields are computed from the transaction and optional wallet
//! history; on-chain fields come from the pluggable enrichment provider.

pub mod enrichment;
pub mod extractor;

pub use enrichment::{EnrichmentData, EnrichmentProvider, SimulatedEnrichment};
pub use extractor::FeatureExtractor;

use serde::{Deserialize, Serialize};

/// Classification of the recipient account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Externally-owned account.
    Wallet,
    /// Deployed contract.
    Contract,
    /// Could not be determined (degraded enrichment).
    Unknown,
}

/// Fixed-schema feature vector for one transaction.
///
/// Field order and presence never vary with input; missing context
/// degrades individual fields to their documented defaults. The nine
/// numeric fields feed the anomaly model, the two categorical fields
/// (`recipient_contract_type`, `recipient_ens`) are explanation-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Recipient account classification.
    pub recipient_contract_type: ContractType,
    /// ENS name resolved for the recipient, if any.
    pub recipient_ens: Option<String>,
    /// Recipient cluster-risk score in [0, 1].
    pub recipient_cluster_risk: f64,
    /// Sender wallet age in days.
    pub wallet_age_days: f64,
    /// Recipient wallet age in days.
    pub recipient_age_days: f64,
    /// Transaction value divided by the sender's historical average
    /// (divided by 1 when no average is known).
    pub value_to_avg_ratio: f64,
    /// Prior interactions between sender and recipient.
    pub interaction_frequency: f64,
    /// Recipient token-hygiene score in [0, 1].
    pub recipient_token_hygiene: f64,
    /// Similarity of the recipient's contract code to known templates,
    /// in [0, 1].
    pub contract_code_similarity_score: f64,
    /// |gas - avg_gas| / avg_gas, non-negative and unbounded.
    pub gas_volatility_score: f64,
    /// 1 if the transaction lands in the odd-hours window, else 0.
    pub tx_time_deviation: f64,
}

impl FeatureVector {
    /// The nine numeric fields paired with their canonical names, in the
    /// order recorded by the model artifact at training time.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 9] {
        [
            ("wallet_age_days", self.wallet_age_days),
            ("recipient_age_days", self.recipient_age_days),
            ("value_to_avg_ratio", self.value_to_avg_ratio),
            ("interaction_frequency", self.interaction_frequency),
            ("recipient_token_hygiene", self.recipient_token_hygiene),
            (
                "contract_code_similarity_score",
                self.contract_code_similarity_score,
            ),
            ("gas_volatility_score", self.gas_volatility_score),
            ("tx_time_deviation", self.tx_time_deviation),
            ("recipient_cluster_risk", self.recipient_cluster_risk),
        ]
    }
}
