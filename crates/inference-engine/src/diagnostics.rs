//! Diagnostic Events
//!
//! Everything the prediction path wants to say about itself goes through a
//! [`DiagnosticSink`]. The production sink writes through `tracing` (stderr);
//! tests collect events in memory.

use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use vitals::FeatureSet;

/// Install a stderr subscriber at `level` (`trace`..`error`, default `info`)
pub fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    // Already installed when embedded or under test.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Something noteworthy that happened while producing a prediction
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    /// Vitals could not be parsed
    InvalidInput { error: String },
    /// A parsed vital lies outside its plausible range
    ImplausibleVital { error: String },
    /// Configuration could not be loaded; defaults are in use
    ConfigUnavailable { error: String },
    /// Candidate model file does not exist
    ModelMissing { path: PathBuf },
    /// Model loaded from a candidate path
    ModelLoaded { path: PathBuf },
    /// Candidate model file exists but could not be loaded
    ModelLoadFailed { path: PathBuf, error: String },
    /// No candidate yielded a model
    ModelUnavailable { candidates: usize },
    /// Features could not be matched to the model's declared names
    FeatureReorderFailed { error: String },
    /// Model rejected a feature row
    PredictionFailed { feature_set: FeatureSet, error: String },
    /// Rule-based fallback produced the label
    FallbackUsed { reason: &'static str, score: u32 },
    /// Model class probabilities
    Probabilities { values: Vec<f64> },
    /// Probabilities could not be computed
    ProbabilitiesUnavailable { error: String },
}

/// Receiver for diagnostic events
pub trait DiagnosticSink {
    /// Record one event
    fn record(&self, event: DiagnosticEvent);
}

/// Sink that forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: DiagnosticEvent) {
        match event {
            DiagnosticEvent::InvalidInput { error } => warn!("Bad numeric conversion: {}", error),
            DiagnosticEvent::ImplausibleVital { error } => warn!("Implausible vital: {}", error),
            DiagnosticEvent::ConfigUnavailable { error } => {
                warn!("Configuration unavailable, using defaults: {}", error)
            }
            DiagnosticEvent::ModelMissing { path } => debug!("No model at {}", path.display()),
            DiagnosticEvent::ModelLoaded { path } => info!("Loaded model from {}", path.display()),
            DiagnosticEvent::ModelLoadFailed { path, error } => {
                warn!("Found model file but failed to load {}: {}", path.display(), error)
            }
            DiagnosticEvent::ModelUnavailable { candidates } => {
                info!("No model found in {} candidate paths", candidates)
            }
            DiagnosticEvent::FeatureReorderFailed { error } => {
                warn!("Could not match model feature names: {}", error)
            }
            DiagnosticEvent::PredictionFailed { feature_set, error } => {
                warn!("Model predict failed on {} features: {}", feature_set.as_str(), error)
            }
            DiagnosticEvent::FallbackUsed { reason, score } => {
                info!("Fallback rule used ({}), score={}", reason, score)
            }
            DiagnosticEvent::Probabilities { values } => debug!("probs={:?}", values),
            DiagnosticEvent::ProbabilitiesUnavailable { error } => {
                debug!("predict_proba failed: {}", error)
            }
        }
    }
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, event: DiagnosticEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
