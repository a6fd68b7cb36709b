//! Classifier Contract

use crate::InferenceError;
use serde::{Deserialize, Serialize};
use vitals::{FeatureVector, StatusLabel};

/// Raw value returned by a classifier's `predict`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelOutput {
    /// Numeric class index
    ClassIndex(i64),
    /// Class name
    Label(String),
}

impl ModelOutput {
    /// Normalize into the label emitted to callers.
    ///
    /// Class indices map 0/1/2 onto Normal/Warning/Critical; any other index is
    /// emitted as its decimal form.
    pub fn into_label(self) -> String {
        match self {
            ModelOutput::ClassIndex(index) => StatusLabel::from_class_index(index)
                .map(|label| label.as_str().to_string())
                .unwrap_or_else(|| index.to_string()),
            ModelOutput::Label(label) => label,
        }
    }
}

/// A trained classifier over a single feature row
pub trait Classifier {
    /// Predict the class of one row
    fn predict(&self, features: &FeatureVector) -> Result<ModelOutput, InferenceError>;

    /// Class probabilities for one row, if the model supports them
    fn predict_proba(&self, _features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        Err(InferenceError::Unsupported("predict_proba"))
    }

    /// Feature names in the order the model was trained on, if recorded
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}
