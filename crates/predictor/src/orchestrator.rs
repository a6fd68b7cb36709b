//! Prediction Orchestrator
//!
//! Turns six raw vital strings into exactly one status label. Each stage
//! falls through to the next on failure:
//!
//! 1. parse the inputs (failure: `Normal`, nothing else runs)
//! 2. look up a model (unavailable: rule-based fallback)
//! 3. predict on the full row, then once on the legacy row (failure: fallback)
//! 4. normalize the model output into a label
//!
//! Probabilities are computed afterwards for diagnostics only.

use fallback::{FallbackEngine, SeverityScore};
use inference_engine::{DiagnosticEvent, DiagnosticSink, InferenceEngine, ModelLookup, ModelSource};
use std::path::PathBuf;
use tracing::debug;
use vitals::{FeatureSet, StatusLabel, ValidationConfig, Validator, VitalReading};

/// Why the fallback rule produced the label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No candidate path yielded a model
    ModelUnavailable,
    /// The model rejected both feature rows
    PredictionFailed,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::ModelUnavailable => "model unavailable",
            FallbackReason::PredictionFailed => "prediction failed",
        }
    }
}

/// Which path produced the label
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Inputs did not parse; the label is always `Normal`
    InvalidInput,
    /// A loaded model produced the label
    Model { path: PathBuf, feature_set: FeatureSet },
    /// The threshold rule produced the label
    Fallback {
        reason: FallbackReason,
        score: SeverityScore,
    },
}

/// Label plus provenance
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub label: String,
    pub decision: Decision,
}

/// Per-request predictor over a model source
pub struct Predictor<S: ModelSource> {
    source: S,
    fallback: FallbackEngine,
    validator: Validator,
}

impl<S: ModelSource> Predictor<S> {
    /// Create a predictor with default plausibility ranges
    pub fn new(source: S) -> Self {
        Self::with_validation(source, ValidationConfig::default())
    }

    /// Create a predictor with custom plausibility ranges
    pub fn with_validation(source: S, validation: ValidationConfig) -> Self {
        Self {
            source,
            fallback: FallbackEngine::new(),
            validator: Validator::new(validation),
        }
    }

    /// Predict a label for `args` (`age heartRate temperature oxygen bp_sys bp_dia`).
    ///
    /// Never fails; extra arguments are ignored.
    pub fn predict<A: AsRef<str>>(&self, args: &[A], sink: &dyn DiagnosticSink) -> PredictionOutcome {
        let reading = match VitalReading::parse(args) {
            Ok(reading) => reading,
            Err(e) => {
                sink.record(DiagnosticEvent::InvalidInput { error: e.to_string() });
                return PredictionOutcome {
                    label: StatusLabel::Normal.to_string(),
                    decision: Decision::InvalidInput,
                };
            }
        };

        for error in self.validator.validate(&reading).errors {
            sink.record(DiagnosticEvent::ImplausibleVital { error: error.to_string() });
        }

        let (model, path) = match self.source.lookup(sink) {
            ModelLookup::Found { model, path } => (model, path),
            ModelLookup::Unavailable { attempts } => {
                debug!("{} model candidates tried", attempts.len());
                return self.fall_back(&reading, FallbackReason::ModelUnavailable, sink);
            }
        };

        let engine = InferenceEngine::new(model, path);
        let result = match engine.predict(&reading, sink) {
            Ok(result) => result,
            Err(_) => return self.fall_back(&reading, FallbackReason::PredictionFailed, sink),
        };

        match engine.probabilities(&result.features) {
            Ok(values) => sink.record(DiagnosticEvent::Probabilities { values }),
            Err(e) => sink.record(DiagnosticEvent::ProbabilitiesUnavailable { error: e.to_string() }),
        }

        PredictionOutcome {
            label: result.output.into_label(),
            decision: Decision::Model {
                path: engine.model_path().to_path_buf(),
                feature_set: result.feature_set,
            },
        }
    }

    fn fall_back(
        &self,
        reading: &VitalReading,
        reason: FallbackReason,
        sink: &dyn DiagnosticSink,
    ) -> PredictionOutcome {
        let score = self.fallback.score(reading);
        let label = self.fallback.classify(score.total());
        sink.record(DiagnosticEvent::FallbackUsed {
            reason: reason.as_str(),
            score: score.total(),
        });
        PredictionOutcome {
            label: label.to_string(),
            decision: Decision::Fallback { reason, score },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inference_engine::{
        Classifier, InferenceError, LoadAttempt, MemorySink, ModelLocator, ModelOutput,
    };
    use std::cell::Cell;
    use vitals::FeatureVector;

    /// Source that never finds a model
    struct NoModel;

    impl ModelSource for NoModel {
        fn lookup(&self, _sink: &dyn DiagnosticSink) -> ModelLookup {
            ModelLookup::Unavailable {
                attempts: Vec::<LoadAttempt>::new(),
            }
        }
    }

    /// Model that answers only rows of a given width
    #[derive(Clone)]
    struct FixedModel {
        width: usize,
        output: ModelOutput,
        proba: Option<Vec<f64>>,
    }

    impl Classifier for FixedModel {
        fn predict(&self, features: &FeatureVector) -> Result<ModelOutput, InferenceError> {
            if features.len() != self.width {
                return Err(InferenceError::InvalidInputShape {
                    expected: self.width,
                    actual: features.len(),
                });
            }
            Ok(self.output.clone())
        }

        fn predict_proba(&self, _features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
            self.proba
                .clone()
                .ok_or(InferenceError::Unsupported("predict_proba"))
        }
    }

    /// Source that hands out a fresh copy of one model and counts lookups
    struct OneModel {
        model: FixedModel,
        lookups: Cell<usize>,
    }

    impl OneModel {
        fn new(width: usize, output: ModelOutput) -> Self {
            Self {
                model: FixedModel {
                    width,
                    output,
                    proba: None,
                },
                lookups: Cell::new(0),
            }
        }
    }

    impl ModelSource for OneModel {
        fn lookup(&self, _sink: &dyn DiagnosticSink) -> ModelLookup {
            self.lookups.set(self.lookups.get() + 1);
            ModelLookup::Found {
                model: Box::new(self.model.clone()),
                path: PathBuf::from("app/model.bin"),
            }
        }
    }

    fn args(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn test_no_model_critical() {
        let predictor = Predictor::new(NoModel);
        let sink = MemorySink::new();

        let outcome = predictor.predict(&args("70 150 104.2 85 180 100"), &sink);
        assert_eq!(outcome.label, "Critical");
        match outcome.decision {
            Decision::Fallback { reason, score } => {
                assert_eq!(reason, FallbackReason::ModelUnavailable);
                assert_eq!(score.total(), 11);
            }
            other => panic!("expected fallback, got {:?}", other),
        }
        assert!(sink.events().contains(&DiagnosticEvent::FallbackUsed {
            reason: "model unavailable",
            score: 11,
        }));
    }

    #[test]
    fn test_no_model_normal() {
        let predictor = Predictor::new(NoModel);
        let outcome = predictor.predict(&args("30 80 98.6 98 120 80"), &MemorySink::new());
        assert_eq!(outcome.label, "Normal");
    }

    #[test]
    fn test_no_model_boundary_critical() {
        let predictor = Predictor::new(NoModel);
        let outcome = predictor.predict(&args("80 105 100.5 93 165 95"), &MemorySink::new());
        assert_eq!(outcome.label, "Critical");
        assert!(matches!(
            outcome.decision,
            Decision::Fallback { score, .. } if score.total() == 6
        ));
    }

    #[test]
    fn test_invalid_input_skips_everything() {
        let source = OneModel::new(6, ModelOutput::ClassIndex(2));
        let predictor = Predictor::new(source);
        let sink = MemorySink::new();

        let outcome = predictor.predict(&args("abc 80 98 97 120 80"), &sink);
        assert_eq!(outcome.label, "Normal");
        assert_eq!(outcome.decision, Decision::InvalidInput);
        assert_eq!(predictor.source.lookups.get(), 0);
        assert!(matches!(
            sink.events().as_slice(),
            [DiagnosticEvent::InvalidInput { .. }]
        ));
    }

    #[test]
    fn test_class_index_two_is_critical() {
        let predictor = Predictor::new(OneModel::new(6, ModelOutput::ClassIndex(2)));
        let outcome = predictor.predict(&args("30 80 98.6 98 120 80"), &MemorySink::new());
        assert_eq!(outcome.label, "Critical");
        assert_eq!(
            outcome.decision,
            Decision::Model {
                path: PathBuf::from("app/model.bin"),
                feature_set: FeatureSet::Full,
            }
        );
    }

    #[test]
    fn test_label_output_used_directly() {
        let predictor = Predictor::new(OneModel::new(6, ModelOutput::Label("Warning".to_string())));
        let outcome = predictor.predict(&args("30 80 98.6 98 120 80"), &MemorySink::new());
        assert_eq!(outcome.label, "Warning");
    }

    #[test]
    fn test_unmapped_class_index_stringified() {
        let predictor = Predictor::new(OneModel::new(6, ModelOutput::ClassIndex(7)));
        let outcome = predictor.predict(&args("30 80 98.6 98 120 80"), &MemorySink::new());
        assert_eq!(outcome.label, "7");
    }

    #[test]
    fn test_legacy_retry_output() {
        let predictor = Predictor::new(OneModel::new(4, ModelOutput::ClassIndex(1)));
        let outcome = predictor.predict(&args("70 150 104.2 85 180 100"), &MemorySink::new());
        assert_eq!(outcome.label, "Warning");
        assert!(matches!(
            outcome.decision,
            Decision::Model { feature_set: FeatureSet::Legacy, .. }
        ));
    }

    #[test]
    fn test_model_failure_falls_back() {
        let predictor = Predictor::new(OneModel::new(3, ModelOutput::ClassIndex(0)));
        let sink = MemorySink::new();

        let outcome = predictor.predict(&args("70 150 104.2 85 180 100"), &sink);
        assert_eq!(outcome.label, "Critical");
        assert!(matches!(
            outcome.decision,
            Decision::Fallback { reason: FallbackReason::PredictionFailed, .. }
        ));
        let failures = sink
            .events()
            .iter()
            .filter(|e| matches!(e, DiagnosticEvent::PredictionFailed { .. }))
            .count();
        assert_eq!(failures, 2);
    }

    #[test]
    fn test_probabilities_go_to_diagnostics() {
        let mut source = OneModel::new(6, ModelOutput::ClassIndex(0));
        source.model.proba = Some(vec![0.8, 0.15, 0.05]);
        let predictor = Predictor::new(source);
        let sink = MemorySink::new();

        let outcome = predictor.predict(&args("30 80 98.6 98 120 80"), &sink);
        assert_eq!(outcome.label, "Normal");
        assert!(sink.events().contains(&DiagnosticEvent::Probabilities {
            values: vec![0.8, 0.15, 0.05],
        }));
    }

    #[test]
    fn test_probability_failure_is_swallowed() {
        let predictor = Predictor::new(OneModel::new(6, ModelOutput::ClassIndex(1)));
        let sink = MemorySink::new();

        let outcome = predictor.predict(&args("30 80 98.6 98 120 80"), &sink);
        assert_eq!(outcome.label, "Warning");
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, DiagnosticEvent::ProbabilitiesUnavailable { .. })));
    }

    #[test]
    fn test_implausible_vital_still_scored() {
        let predictor = Predictor::new(NoModel);
        let sink = MemorySink::new();

        let outcome = predictor.predict(&args("30 80 98.6 140 120 80"), &sink);
        assert_eq!(outcome.label, "Normal");
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, DiagnosticEvent::ImplausibleVital { .. })));
    }

    #[test]
    fn test_missing_model_matches_fallback_engine() {
        let predictor = Predictor::new(NoModel);
        let engine = FallbackEngine::new();
        for input in [
            "70 150 104.2 85 180 100",
            "30 80 98.6 98 120 80",
            "80 105 100.5 93 165 95",
            "76 101 99.5 95 141 81",
        ] {
            let raw = args(input);
            let outcome = predictor.predict(&raw, &MemorySink::new());
            assert_eq!(outcome.label, engine.evaluate_raw(&raw).to_string(), "{}", input);
        }
    }

    #[test]
    fn test_idempotent() {
        let predictor = Predictor::new(OneModel::new(4, ModelOutput::ClassIndex(2)));
        let first = predictor.predict(&args("70 150 104.2 85 180 100"), &MemorySink::new());
        let second = predictor.predict(&args("70 150 104.2 85 180 100"), &MemorySink::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_extra_args_ignored() {
        let predictor = Predictor::new(NoModel);
        let outcome = predictor.predict(&args("30 80 98.6 98 120 80 extra"), &MemorySink::new());
        assert_eq!(outcome.label, "Normal");
    }

    /// Decodable artifact whose single split points at `left`/`right`
    fn malformed_artifact(left: u8, right: u8) -> Vec<u8> {
        let mut bytes = vec![1, 0, 0, 6, 3, 1, 1, 1, 0];
        bytes.extend_from_slice(&0.0f64.to_le_bytes());
        bytes.extend_from_slice(&[left, right]);
        bytes
    }

    #[test]
    fn test_malformed_forest_falls_back() {
        for (left, right) in [(7, 7), (0, 0)] {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path().join("srv").join("health").join("bin");
            std::fs::create_dir_all(&root).unwrap();
            std::fs::write(root.join("model.bin"), malformed_artifact(left, right)).unwrap();

            let predictor = Predictor::new(ModelLocator::with_defaults(&root));
            let sink = MemorySink::new();
            let outcome = predictor.predict(&args("70 150 104.2 85 180 100"), &sink);

            assert_eq!(outcome.label, "Critical");
            assert!(matches!(
                outcome.decision,
                Decision::Fallback { reason: FallbackReason::ModelUnavailable, .. }
            ));
            assert!(sink
                .events()
                .iter()
                .any(|e| matches!(e, DiagnosticEvent::ModelLoadFailed { .. })));
        }
    }
}
