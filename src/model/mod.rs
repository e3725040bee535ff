//! Trained anomaly model: scaler, isolation forest, persisted artifact
//! and the scorer that applies the normalization law.

pub mod artifact;
pub mod forest;
pub mod scaler;
pub mod scorer;

pub use artifact::{ModelArtifact, ModelHandle, ModelStore, SCHEMA_VERSION};
pub use forest::{IsolationForest, IsolationTree, OutlierModel, TreeNode};
pub use scaler::StandardScaler;
pub use scorer::AnomalyScorer;
