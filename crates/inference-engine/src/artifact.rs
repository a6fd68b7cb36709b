//! Model Artifact
//!
//! Postcard-encoded forest plus the feature and class names it was trained on.

use crate::forest::RandomForest;
use crate::model::{Classifier, ModelOutput};
use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use vitals::FeatureVector;

/// Current artifact layout version
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Serialized classifier written by the trainer and read by the predictor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Layout version, checked on load
    pub format_version: u32,
    /// Feature names in training column order
    pub feature_names: Vec<String>,
    /// Class names indexed by encoded label
    pub classes: Vec<String>,
    /// Fitted forest
    pub forest: RandomForest,
}

impl ModelArtifact {
    /// Wrap a fitted forest
    pub fn new(feature_names: Vec<String>, classes: Vec<String>, forest: RandomForest) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            feature_names,
            classes,
            forest,
        }
    }

    /// Encode to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, InferenceError> {
        Ok(postcard::to_allocvec(self)?)
    }

    /// Decode from bytes, rejecting unknown layout versions and malformed forests
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InferenceError> {
        let artifact: ModelArtifact = postcard::from_bytes(bytes)?;
        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(InferenceError::UnsupportedFormat(artifact.format_version));
        }
        artifact.forest.validate()?;
        if !artifact.feature_names.is_empty() && artifact.feature_names.len() != artifact.forest.n_features() {
            return Err(InferenceError::Codec(format!(
                "{} feature names for a forest over {} features",
                artifact.feature_names.len(),
                artifact.forest.n_features()
            )));
        }
        Ok(artifact)
    }

    /// Write to `path` through a temporary sibling file
    pub fn save(&self, path: &Path) -> Result<(), InferenceError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let bytes = self.to_bytes()?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;

        info!("Model saved to {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Read from `path`
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let bytes = fs::read(path)?;
        let artifact = Self::from_bytes(&bytes)?;
        debug!(
            "Artifact {}: {} trees, features {:?}, classes {:?}",
            path.display(),
            artifact.forest.n_trees(),
            artifact.feature_names,
            artifact.classes
        );
        Ok(artifact)
    }
}

impl Classifier for ModelArtifact {
    fn predict(&self, features: &FeatureVector) -> Result<ModelOutput, InferenceError> {
        let class = self.forest.predict(features.values())?;
        Ok(match self.classes.get(class) {
            Some(name) => ModelOutput::Label(name.clone()),
            None => ModelOutput::ClassIndex(class as i64),
        })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        self.forest.predict_proba(features.values())
    }

    fn feature_names(&self) -> Option<&[String]> {
        if self.feature_names.is_empty() {
            None
        } else {
            Some(&self.feature_names)
        }
    }
}
