//! Health Status Inference
//!
//! Classifier contract, the random-forest model and its on-disk artifact,
//! ONNX models via tract, model lookup across candidate paths, and
//! feature-shape adaptation at prediction time.

mod artifact;
mod diagnostics;
mod engine;
mod forest;
mod locator;
mod model;
mod onnx;

pub use artifact::{ModelArtifact, ARTIFACT_FORMAT_VERSION};
pub use diagnostics::{init_logging, DiagnosticEvent, DiagnosticSink, MemorySink, TracingSink};
pub use engine::{InferenceEngine, InferenceResult};
pub use forest::{ForestParams, RandomForest};
pub use locator::{
    first_success, load_classifier, normalize_path, AttemptOutcome, LoadAttempt, ModelLocator,
    ModelLookup, ModelSource, DEFAULT_CANDIDATES,
};
pub use model::{Classifier, ModelOutput};
pub use onnx::OnnxClassifier;

use thiserror::Error;

/// Errors during model loading, training and inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
    #[error("Operation not supported by model: {0}")]
    Unsupported(&'static str),
    #[error("Training failed: {0}")]
    TrainingFailed(String),
    #[error("Unsupported artifact format version {0}")]
    UnsupportedFormat(u32),
    #[error("Artifact encoding error: {0}")]
    Codec(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<postcard::Error> for InferenceError {
    fn from(err: postcard::Error) -> Self {
        InferenceError::Codec(err.to_string())
    }
}
