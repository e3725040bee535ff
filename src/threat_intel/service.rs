//! Threat-intel service
//!
//! Fuses blacklist lookup and the three capability providers into one
//! `ThreatIntelResult`. The weighted sum is deterministic in the collected
//! signals so it can be tested independently of any provider.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::blacklist::Blacklist;
use super::providers::{
    AddressLabeler, ContractInspector, SimulatedContractInspector, SimulatedLabeler,
    SimulatedTokenRiskOracle, TokenRiskOracle,
};
use super::{ContractFlag, ThreatIntelProvider, ThreatIntelResult};
use crate::core::errors::Result;

/// Signal weights for the threat score. With every signal present the
/// score reaches its natural maximum of 1.0; no further clamping applies.
const WEIGHT_BLACKLISTED: f64 = 0.5;
const WEIGHT_CONTRACT_FLAG: f64 = 0.2;
const WEIGHT_RUGPULL: f64 = 0.2;
const WEIGHT_LABEL: f64 = 0.1;

/// Deterministic weighted sum over the collected signals, rounded to two
/// decimals.
pub fn compute_threat_score(
    is_blacklisted: bool,
    contract_flag: Option<ContractFlag>,
    token_rugpull_flag: bool,
    label: Option<&str>,
) -> f64 {
    let mut score = 0.0;
    if is_blacklisted {
        score += WEIGHT_BLACKLISTED;
    }
    if contract_flag.is_some() {
        score += WEIGHT_CONTRACT_FLAG;
    }
    if token_rugpull_flag {
        score += WEIGHT_RUGPULL;
    }
    if label.is_some_and(|l| !l.is_empty()) {
        score += WEIGHT_LABEL;
    }
    (score * 100.0).round() / 100.0
}

/// Threat-intelligence service combining the blacklist with pluggable
/// contract/token/label capabilities.
pub struct ThreatIntelService {
    blacklist: Blacklist,
    inspector: Arc<dyn ContractInspector>,
    token_oracle: Arc<dyn TokenRiskOracle>,
    labeler: Arc<dyn AddressLabeler>,
}

impl ThreatIntelService {
    pub fn new(
        blacklist: Blacklist,
        inspector: Arc<dyn ContractInspector>,
        token_oracle: Arc<dyn TokenRiskOracle>,
        labeler: Arc<dyn AddressLabeler>,
    ) -> Self {
        Self {
            blacklist,
            inspector,
            token_oracle,
            labeler,
        }
    }

    /// Service backed by the seeded blacklist and simulated capability
    /// sources.
    pub fn simulated() -> Self {
        Self::new(
            Blacklist::with_seed_entries(),
            Arc::new(SimulatedContractInspector),
            Arc::new(SimulatedTokenRiskOracle),
            Arc::new(SimulatedLabeler),
        )
    }

    pub fn blacklist_mut(&mut self) -> &mut Blacklist {
        &mut self.blacklist
    }
}

#[async_trait]
impl ThreatIntelProvider for ThreatIntelService {
    async fn assess(&self, recipient: &str, token: &str) -> Result<ThreatIntelResult> {
        let blacklist_reason = self.blacklist.lookup(recipient).map(str::to_string);
        let is_blacklisted = blacklist_reason.is_some();

        let contract_flag = self.inspector.inspect(recipient).await?;
        let token_risk = self.token_oracle.assess_token(token).await?;
        let label = self.labeler.label(recipient).await?;

        let threat_score = compute_threat_score(
            is_blacklisted,
            contract_flag,
            token_risk.rugpull_flag,
            label.as_deref(),
        );

        debug!(
            recipient,
            token, is_blacklisted, threat_score, "threat intel assessed"
        );

        Ok(ThreatIntelResult {
            is_blacklisted,
            blacklist_reason,
            contract_flag,
            token_risk_score: token_risk.score,
            token_rugpull_flag: token_risk.rugpull_flag,
            label,
            threat_score,
        })
    }
}
