//! Model Locator
//!
//! Finds a persisted model without the caller naming a path: an ordered list
//! of candidate locations relative to a search root is tried, and the first
//! file that loads wins.

use crate::artifact::ModelArtifact;
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::model::Classifier;
use crate::onnx::OnnxClassifier;
use crate::InferenceError;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Default candidate paths, relative to the search root
pub const DEFAULT_CANDIDATES: [&str; 6] = [
    "model.bin",
    "../model.bin",
    "app/model.bin",
    "../app/model.bin",
    "../../backend/app/model.bin",
    "../../app/model.bin",
];

/// What happened to one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// No file at this path
    Missing,
    /// File exists but did not load
    Failed(String),
}

/// One tried candidate
#[derive(Debug, Clone, PartialEq)]
pub struct LoadAttempt {
    pub path: PathBuf,
    pub outcome: AttemptOutcome,
}

/// Result of a model lookup
pub enum ModelLookup {
    /// A model loaded from `path`
    Found {
        model: Box<dyn Classifier>,
        path: PathBuf,
    },
    /// Every candidate was missing or failed
    Unavailable { attempts: Vec<LoadAttempt> },
}

/// Anything that can produce a model for a prediction
pub trait ModelSource {
    /// Look up a model; never fails, reports problems to `sink`
    fn lookup(&self, sink: &dyn DiagnosticSink) -> ModelLookup;
}

/// Try acquisition strategies in order. The first success wins; if none
/// succeeds, every failure is returned keyed by its strategy.
pub fn first_success<K, T, E, F>(strategies: impl IntoIterator<Item = (K, F)>) -> Result<(K, T), Vec<(K, E)>>
where
    F: FnOnce() -> Result<T, E>,
{
    let mut failures = Vec::new();
    for (key, attempt) in strategies {
        match attempt() {
            Ok(value) => return Ok((key, value)),
            Err(e) => failures.push((key, e)),
        }
    }
    Err(failures)
}

/// Load a classifier, choosing the format by file extension
pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, InferenceError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("onnx") => Ok(Box::new(OnnxClassifier::load(path)?)),
        _ => Ok(Box::new(ModelArtifact::load(path)?)),
    }
}

/// Fold `.` and `..` components without touching the filesystem
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Filesystem model locator
#[derive(Debug, Clone)]
pub struct ModelLocator {
    /// Directory candidates are resolved against
    root: PathBuf,
    /// Candidate paths relative to `root`, in lookup order
    candidates: Vec<PathBuf>,
}

impl ModelLocator {
    /// Create a locator with explicit candidates
    pub fn new(root: impl Into<PathBuf>, candidates: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            candidates,
        }
    }

    /// Create a locator probing [`DEFAULT_CANDIDATES`] under `root`
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self::new(root, DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect())
    }

    /// Directory holding the running executable, or `.` if unknown
    pub fn executable_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Normalized candidate paths in lookup order
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        self.candidates
            .iter()
            .map(|c| normalize_path(&self.root.join(c)))
            .collect()
    }
}

impl ModelSource for ModelLocator {
    fn lookup(&self, sink: &dyn DiagnosticSink) -> ModelLookup {
        let strategies = self.candidate_paths().into_iter().map(|path| {
            let candidate = path.clone();
            let attempt = move || {
                if !candidate.exists() {
                    sink.record(DiagnosticEvent::ModelMissing { path: candidate });
                    return Err(AttemptOutcome::Missing);
                }
                load_classifier(&candidate).map_err(|e| {
                    sink.record(DiagnosticEvent::ModelLoadFailed {
                        path: candidate.clone(),
                        error: e.to_string(),
                    });
                    AttemptOutcome::Failed(e.to_string())
                })
            };
            (path, attempt)
        });

        match first_success(strategies) {
            Ok((path, model)) => {
                sink.record(DiagnosticEvent::ModelLoaded { path: path.clone() });
                ModelLookup::Found { model, path }
            }
            Err(failures) => {
                debug!("Model lookup exhausted {} candidates", failures.len());
                sink.record(DiagnosticEvent::ModelUnavailable {
                    candidates: failures.len(),
                });
                ModelLookup::Unavailable {
                    attempts: failures
                        .into_iter()
                        .map(|(path, outcome)| LoadAttempt { path, outcome })
                        .collect(),
                }
            }
        }
    }
}
