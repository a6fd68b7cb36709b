//! Inference Engine Implementation

use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::model::{Classifier, ModelOutput};
use crate::InferenceError;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;
use vitals::{FeatureSet, FeatureVector, VitalReading};

/// Result of a successful prediction
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// Raw model output
    pub output: ModelOutput,
    /// Row the model accepted
    pub features: FeatureVector,
    /// Which feature subset was used
    pub feature_set: FeatureSet,
    /// Inference latency in milliseconds
    pub latency_ms: u64,
}

/// Runs a loaded classifier with feature-shape adaptation
pub struct InferenceEngine {
    /// Loaded model
    model: Box<dyn Classifier>,
    /// Where the model came from
    model_path: PathBuf,
}

impl InferenceEngine {
    /// Wrap a loaded model
    pub fn new(model: Box<dyn Classifier>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            model,
            model_path: model_path.into(),
        }
    }

    /// Build the full feature row, reordered to the model's declared feature
    /// names when it has them. A row that cannot be matched is used as is.
    pub fn prepare_features(&self, reading: &VitalReading, sink: &dyn DiagnosticSink) -> FeatureVector {
        let features = FeatureVector::from_reading(reading);
        match self.model.feature_names() {
            Some(expected) => features.reorder(expected).unwrap_or_else(|e| {
                sink.record(DiagnosticEvent::FeatureReorderFailed { error: e.to_string() });
                features
            }),
            None => features,
        }
    }

    /// Predict on all six vitals; if the model rejects them, retry once with
    /// the legacy four-feature row.
    pub fn predict(
        &self,
        reading: &VitalReading,
        sink: &dyn DiagnosticSink,
    ) -> Result<InferenceResult, InferenceError> {
        let start = Instant::now();

        let full = self.prepare_features(reading, sink);
        let (features, feature_set, output) = match self.model.predict(&full) {
            Ok(output) => (full, FeatureSet::Full, output),
            Err(e) => {
                sink.record(DiagnosticEvent::PredictionFailed {
                    feature_set: FeatureSet::Full,
                    error: e.to_string(),
                });

                let legacy = FeatureVector::from_reading(reading).legacy();
                match self.model.predict(&legacy) {
                    Ok(output) => (legacy, FeatureSet::Legacy, output),
                    Err(e) => {
                        sink.record(DiagnosticEvent::PredictionFailed {
                            feature_set: FeatureSet::Legacy,
                            error: e.to_string(),
                        });
                        return Err(e);
                    }
                }
            }
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!("Inference completed in {}ms on {} features", latency_ms, feature_set.as_str());

        Ok(InferenceResult {
            output,
            features,
            feature_set,
            latency_ms,
        })
    }

    /// Class probabilities for a row the model already accepted
    pub fn probabilities(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        self.model.predict_proba(features)
    }

    /// Get model path
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}
