// src/lib.rs

//! Transaction fraud-risk fusion engine.
//!
//! Fuses behavioral features, threat intelligence, intent heuristics and
//! an isolation-forest anomaly model into a single fraud probability and
//! risk tier per transaction. Construct a [`engine::RiskFusionEngine`]
//! with a bound [`model::ModelStore`] and call
//! [`engine::RiskFusionEngine::assess`].

pub mod core;
pub mod engine;
pub mod features;
pub mod intent;
pub mod model;
pub mod threat_intel;

pub use crate::core::{EngineConfig, EngineError, Result, Stage, Transaction, WalletHistory};
pub use crate::engine::{FraudVerdict, RiskFusionEngine, RiskTier, ScoringVector};
pub use crate::model::{ModelArtifact, ModelStore};
