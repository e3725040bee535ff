//! Core domain types, configuration, validation and errors.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod validation;

pub use config::EngineConfig;
pub use domain::{Transaction, WalletHistory};
pub use errors::{EngineError, Result, Stage};
