//! Persisted model artifact and the process-wide model store
//!
//! The artifact is the (model, scaler, ordered feature-name list) triple
//! produced by offline training, persisted as JSON. The feature-name list
//! is the authoritative ordering contract for scoring-vector assembly and
//! is checked, together with an explicit schema version, at load time.
//!
//! The store holds the loaded artifact behind an `Arc` that readers clone;
//! a reload swaps the `Arc` atomically so in-flight assessments never see
//! a half-updated model.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::forest::{IsolationForest, OutlierModel};
use super::scaler::StandardScaler;
use crate::core::errors::{EngineError, Result};

/// Artifact layout version this build understands.
pub const SCHEMA_VERSION: u32 = 1;

/// Serialized training output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Layout version, bumped whenever the feature schema changes.
    pub schema_version: u32,
    /// Feature names in training order; authoritative for vector
    /// assembly.
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    pub forest: IsolationForest,
}

impl ModelArtifact {
    /// Read and validate an artifact from disk. The file handle is
    /// released before this returns.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| EngineError::Artifact(format!("failed to parse {:?}: {}", path, e)))?;
        artifact.validate()?;
        info!(
            path = %path.display(),
            features = artifact.feature_names.len(),
            trees = artifact.forest.n_trees(),
            "loaded model artifact"
        );
        Ok(artifact)
    }

    /// Internal consistency checks: supported version, distinct feature
    /// names, agreeing dimensionality across names, scaler and forest,
    /// and structurally sound trees.
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(EngineError::Artifact(format!(
                "artifact schema version {} unsupported (expected {})",
                self.schema_version, SCHEMA_VERSION
            )));
        }
        let mut seen = HashSet::new();
        for name in &self.feature_names {
            if !seen.insert(name.as_str()) {
                return Err(EngineError::SchemaMismatch(format!(
                    "artifact names feature '{}' more than once",
                    name
                )));
            }
        }
        let n = self.feature_names.len();
        if self.scaler.n_features() != n {
            return Err(EngineError::SchemaMismatch(format!(
                "artifact names {} features but scaler was fitted on {}",
                n,
                self.scaler.n_features()
            )));
        }
        if self.forest.n_features() != n {
            return Err(EngineError::SchemaMismatch(format!(
                "artifact names {} features but forest was trained on {}",
                n,
                self.forest.n_features()
            )));
        }
        self.forest.validate()
    }
}

/// Loaded, immutable model state shared by all assessments.
pub struct ModelHandle {
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    pub model: Arc<dyn OutlierModel>,
    pub schema_version: u32,
}

impl ModelHandle {
    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        Self {
            feature_names: artifact.feature_names,
            scaler: artifact.scaler,
            model: Arc::new(artifact.forest),
            schema_version: artifact.schema_version,
        }
    }
}

/// Process-wide holder of the current model handle.
#[derive(Default)]
pub struct ModelStore {
    current: RwLock<Option<Arc<ModelHandle>>>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store already bound to a handle.
    pub fn with_handle(handle: ModelHandle) -> Self {
        let store = Self::new();
        store.bind(handle);
        store
    }

    /// Load an artifact from disk and bind it.
    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let artifact = ModelArtifact::load(path)?;
        self.bind(ModelHandle::from_artifact(artifact));
        Ok(())
    }

    /// Bind (or hot-swap) the current model. In-flight assessments keep
    /// the handle they already cloned.
    pub fn bind(&self, handle: ModelHandle) {
        *self.current.write() = Some(Arc::new(handle));
    }

    /// Current handle, or `ModelNotLoaded` before initialization.
    pub fn current(&self) -> Result<Arc<ModelHandle>> {
        self.current
            .read()
            .as_ref()
            .cloned()
            .ok_or(EngineError::ModelNotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::forest::{IsolationTree, TreeNode};
    use std::io::Write;

    fn tiny_forest(n_features: usize) -> IsolationForest {
        let tree = IsolationTree::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { n_samples: 1 },
            TreeNode::Leaf { n_samples: 200 },
        ]);
        IsolationForest::new(vec![tree], 256, -0.5, n_features)
    }

    fn tiny_artifact() -> ModelArtifact {
        ModelArtifact {
            schema_version: SCHEMA_VERSION,
            feature_names: vec!["a".to_string(), "b".to_string()],
            scaler: StandardScaler::identity(2),
            forest: tiny_forest(2),
        }
    }

    #[test]
    fn test_validate_accepts_consistent_artifact() {
        assert!(tiny_artifact().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_version() {
        let mut artifact = tiny_artifact();
        artifact.schema_version = 99;
        assert!(matches!(
            artifact.validate(),
            Err(EngineError::Artifact(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_feature_names() {
        // Dimensionality agrees, but the same feature is named twice, so
        // any assembled vector would be silently misaligned.
        let mut artifact = tiny_artifact();
        artifact.feature_names = vec!["a".to_string(), "a".to_string()];
        assert!(matches!(
            artifact.validate(),
            Err(EngineError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_validate_rejects_malformed_tree() {
        let mut artifact = tiny_artifact();
        artifact.forest = IsolationForest::new(
            vec![IsolationTree::new(vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 99,
                    right: 2,
                },
                TreeNode::Leaf { n_samples: 1 },
                TreeNode::Leaf { n_samples: 1 },
            ])],
            256,
            -0.5,
            2,
        );
        assert!(matches!(
            artifact.validate(),
            Err(EngineError::Artifact(_))
        ));

        // The same artifact from disk is rejected before binding.
        let mut file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut file, &artifact).unwrap();
        file.flush().unwrap();

        let store = ModelStore::new();
        assert!(store.load_from_path(file.path()).is_err());
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_validate_rejects_dimension_disagreement() {
        let mut artifact = tiny_artifact();
        artifact.feature_names.push("c".to_string());
        assert!(matches!(
            artifact.validate(),
            Err(EngineError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_store_starts_unloaded() {
        let store = ModelStore::new();
        assert!(!store.is_loaded());
        assert!(matches!(
            store.current(),
            Err(EngineError::ModelNotLoaded)
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut file, &tiny_artifact()).unwrap();
        file.flush().unwrap();

        let store = ModelStore::new();
        store.load_from_path(file.path()).unwrap();
        assert!(store.is_loaded());

        let handle = store.current().unwrap();
        assert_eq!(handle.feature_names, vec!["a", "b"]);
        assert_eq!(handle.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_corrupt_artifact_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        file.flush().unwrap();

        let store = ModelStore::new();
        assert!(matches!(
            store.load_from_path(file.path()),
            Err(EngineError::Artifact(_))
        ));
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_hot_swap_keeps_old_handle_alive() {
        let store = ModelStore::with_handle(ModelHandle::from_artifact(tiny_artifact()));
        let before = store.current().unwrap();

        let mut replacement = tiny_artifact();
        replacement.feature_names = vec!["x".to_string(), "y".to_string()];
        store.bind(ModelHandle::from_artifact(replacement));

        // The old clone is unaffected; new reads see the swap.
        assert_eq!(before.feature_names, vec!["a", "b"]);
        assert_eq!(store.current().unwrap().feature_names, vec!["x", "y"]);
    }
}
