//! Threat intelligence
//!
//! Structured reputation assessment of a recipient/token pair: blacklist
//! membership, contract behavior flags, token risk and address labels,
//! combined into a deterministic weighted threat score. The individual
//! lookups are capability traits so live feeds (Chainabuse, Etherscan
//! labels, token scanners) can replace the simulated ones.

pub mod blacklist;
pub mod providers;
pub mod service;

pub use blacklist::Blacklist;
pub use providers::{
    AddressLabeler, ContractInspector, SimulatedContractInspector, SimulatedLabeler,
    SimulatedTokenRiskOracle, TokenRisk, TokenRiskOracle,
};
pub use service::ThreatIntelService;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::Result;

/// Default token assessed when the caller names none.
pub const NATIVE_TOKEN: &str = "native";

/// Known-bad contract behavior classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractFlag {
    ProxyContract,
    FlashloanExploiter,
    HoneypotTrigger,
}

/// Structured threat assessment for a recipient/token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatIntelResult {
    pub is_blacklisted: bool,
    pub blacklist_reason: Option<String>,
    pub contract_flag: Option<ContractFlag>,
    /// Token risk score in [0, 1].
    pub token_risk_score: f64,
    pub token_rugpull_flag: bool,
    /// Descriptive label for the address, if any source carries one.
    pub label: Option<String>,
    /// Deterministic weighted sum over the signals above, rounded to two
    /// decimals. See [`service::compute_threat_score`].
    pub threat_score: f64,
}

impl ThreatIntelResult {
    /// All-clear stand-in used when the provider times out or fails and
    /// the engine degrades instead of aborting. Verdicts built from this
    /// are marked degraded.
    pub fn neutral() -> Self {
        Self {
            is_blacklisted: false,
            blacklist_reason: None,
            contract_flag: None,
            token_risk_score: 0.0,
            token_rugpull_flag: false,
            label: None,
            threat_score: 0.0,
        }
    }
}

/// Boundary the fusion engine depends on; the concrete data sources behind
/// it are out of scope.
#[async_trait]
pub trait ThreatIntelProvider: Send + Sync {
    async fn assess(&self, recipient: &str, token: &str) -> Result<ThreatIntelResult>;
}
