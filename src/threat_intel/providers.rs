//! Threat-intel capability traits and simulated sources
//!
//! Each lookup the service fuses is its own capability: contract
//! inspection, token risk, address labeling. The simulated implementations
//! reproduce the behavior of unavailable live feeds; deterministic fixed
//! implementations live in test code.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;

use super::ContractFlag;
use crate::core::errors::Result;

/// Token-level risk assessment.
#[derive(Debug, Clone, Copy)]
pub struct TokenRisk {
    /// Risk score in [0, 1], rounded to two decimals.
    pub score: f64,
    /// Whether the token shows rugpull characteristics.
    pub rugpull_flag: bool,
}

/// Classifies a recipient's contract bytecode/behavior.
#[async_trait]
pub trait ContractInspector: Send + Sync {
    async fn inspect(&self, recipient: &str) -> Result<Option<ContractFlag>>;
}

/// Scores a token for rug-pull/scam characteristics.
#[async_trait]
pub trait TokenRiskOracle: Send + Sync {
    async fn assess_token(&self, token: &str) -> Result<TokenRisk>;
}

/// Resolves a descriptive label for an address, if one is known.
#[async_trait]
pub trait AddressLabeler: Send + Sync {
    async fn label(&self, address: &str) -> Result<Option<String>>;
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Simulated inspector: flags ~30% of contracts with a uniformly chosen
/// flag, mirroring the hit rate a live bytecode classifier reports.
#[derive(Debug, Default)]
pub struct SimulatedContractInspector;

#[async_trait]
impl ContractInspector for SimulatedContractInspector {
    async fn inspect(&self, _recipient: &str) -> Result<Option<ContractFlag>> {
        let mut rng = rand::thread_rng();
        if rng.gen::<f64>() < 0.3 {
            let flags = [
                ContractFlag::ProxyContract,
                ContractFlag::FlashloanExploiter,
                ContractFlag::HoneypotTrigger,
            ];
            Ok(flags.choose(&mut rng).copied())
        } else {
            Ok(None)
        }
    }
}

/// Simulated token oracle: ~10% rugpull rate; rugpull tokens score in
/// [0.1, 1.0], clean tokens in [0.0, 0.3].
#[derive(Debug, Default)]
pub struct SimulatedTokenRiskOracle;

#[async_trait]
impl TokenRiskOracle for SimulatedTokenRiskOracle {
    async fn assess_token(&self, _token: &str) -> Result<TokenRisk> {
        let mut rng = rand::thread_rng();
        let rugpull_flag = rng.gen::<f64>() < 0.1;
        let score = if rugpull_flag {
            round2(rng.gen_range(0.1..1.0))
        } else {
            round2(rng.gen_range(0.0..0.3))
        };
        Ok(TokenRisk { score, rugpull_flag })
    }
}

/// Simulated labeler drawing from the label set a block-explorer API
/// typically returns, including "no label".
#[derive(Debug, Default)]
pub struct SimulatedLabeler;

#[async_trait]
impl AddressLabeler for SimulatedLabeler {
    async fn label(&self, _address: &str) -> Result<Option<String>> {
        let labels = ["Fake USDT", "Suspicious Mixer", "Wallet Drainer"];
        let mut rng = rand::thread_rng();
        // One-in-four chance of no label, matching the simulated feed.
        if rng.gen_range(0..4) == 0 {
            Ok(None)
        } else {
            Ok(labels.choose(&mut rng).map(|l| l.to_string()))
        }
    }
}
