//! ONNX Classifier
//!
//! Runs classifiers exported to ONNX through tract. The first model output is
//! the label tensor (integer class or string); the second, when present, holds
//! class probabilities.

use crate::model::{Classifier, ModelOutput};
use crate::InferenceError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tract_onnx::prelude::*;
use vitals::FeatureVector;

/// ONNX model loaded with tract
pub struct OnnxClassifier {
    /// Undecorated model; input shape is fixed per call
    model: InferenceModel,
    /// Model path
    model_path: PathBuf,
}

impl OnnxClassifier {
    /// Parse an ONNX model from disk
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        info!("Loading ONNX model: {}", path.display());
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| InferenceError::ModelLoadError(e.to_string()))?;

        Ok(Self {
            model,
            model_path: path.to_path_buf(),
        })
    }

    /// Get model path
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Specialize the model to a `1 x n` input and run it
    fn run(&self, features: &FeatureVector) -> TractResult<TVec<TValue>> {
        let n = features.len();
        let plan = self
            .model
            .clone()
            .with_input_fact(0, f32::fact([1, n]).into())?
            .into_optimized()?
            .into_runnable()?;

        let values: Vec<f32> = features.values().iter().map(|&v| v as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, n), values)?.into();

        debug!("Running ONNX model on {} features", n);
        plan.run(tvec!(input.into()))
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<ModelOutput, InferenceError> {
        let outputs = self
            .run(features)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let labels = outputs
            .first()
            .ok_or_else(|| InferenceError::InferenceFailed("model produced no outputs".to_string()))?;
        decode_label(labels)
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        let outputs = self
            .run(features)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let probabilities = outputs.get(1).ok_or(InferenceError::Unsupported("predict_proba"))?;
        let view = probabilities
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        Ok(view.iter().map(|&p| p as f64).collect())
    }
}

fn decode_label(tensor: &Tensor) -> Result<ModelOutput, InferenceError> {
    let empty = || InferenceError::InferenceFailed("empty label tensor".to_string());

    if let Ok(view) = tensor.to_array_view::<i64>() {
        return view.iter().next().map(|&v| ModelOutput::ClassIndex(v)).ok_or_else(empty);
    }
    if let Ok(view) = tensor.to_array_view::<i32>() {
        return view
            .iter()
            .next()
            .map(|&v| ModelOutput::ClassIndex(v as i64))
            .ok_or_else(empty);
    }
    if let Ok(view) = tensor.to_array_view::<String>() {
        return view
            .iter()
            .next()
            .map(|v| ModelOutput::Label(v.clone()))
            .ok_or_else(empty);
    }

    Err(InferenceError::InferenceFailed(format!(
        "unsupported label tensor type {:?}",
        tensor.datum_type()
    )))
}
