//! On-chain enrichment capability
//!
//! Supplies the feature fields that need an external data source: account
//! classification, ENS resolution, cluster risk, wallet ages, token
//! hygiene and contract-code similarity. The fusion logic only sees the
//! trait, so a real indexer can replace the simulated source without
//! touching anything downstream.

use async_trait::async_trait;
use rand::Rng;

use super::ContractType;
use crate::core::domain::Transaction;
use crate::core::errors::Result;

/// Enrichment fields for one transaction.
#[derive(Debug, Clone)]
pub struct EnrichmentData {
    pub contract_type: ContractType,
    pub ens_name: Option<String>,
    /// Cluster-risk score in [0, 1].
    pub cluster_risk: f64,
    pub sender_age_days: f64,
    pub recipient_age_days: f64,
    /// Token-hygiene score in [0, 1].
    pub token_hygiene: f64,
    /// Contract-code similarity score in [0, 1].
    pub contract_similarity: f64,
}

impl EnrichmentData {
    /// Neutral stand-in used when the provider times out or fails and the
    /// engine is configured to degrade: unknown account type, midpoint
    /// scores, zero ages. Verdicts built from this are marked degraded.
    pub fn neutral() -> Self {
        Self {
            contract_type: ContractType::Unknown,
            ens_name: None,
            cluster_risk: 0.5,
            sender_age_days: 0.0,
            recipient_age_days: 0.0,
            token_hygiene: 0.5,
            contract_similarity: 0.5,
        }
    }
}

/// Capability supplying the externally-sourced feature fields.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    async fn enrich(&self, tx: &Transaction) -> Result<EnrichmentData>;
}

/// Simulated enrichment source.
///
/// Stands in for an on-chain indexer: classifies every recipient as a
/// contract, resolves no ENS names, and draws the scores/ages at random in
/// the same ranges a live source would report. Unit tests use fixed
/// providers instead.
#[derive(Debug, Default)]
pub struct SimulatedEnrichment;

#[async_trait]
impl EnrichmentProvider for SimulatedEnrichment {
    async fn enrich(&self, _tx: &Transaction) -> Result<EnrichmentData> {
        let mut rng = rand::thread_rng();
        Ok(EnrichmentData {
            contract_type: ContractType::Contract,
            ens_name: None,
            cluster_risk: rng.gen_range(0.0..1.0),
            sender_age_days: rng.gen_range(1..1000) as f64,
            recipient_age_days: rng.gen_range(1..1000) as f64,
            token_hygiene: rng.gen_range(0.0..1.0),
            contract_similarity: rng.gen_range(0.0..1.0),
        })
    }
}
