//! Health Status Trainer
//!
//! Fits the random forest consumed by the predictor:
//! - Positional CSV loading
//! - Alphabetical label encoding
//! - Seeded stratified hold-out split
//! - Accuracy and per-class report

pub mod config;
pub mod dataset;
pub mod encoder;
pub mod metrics;
pub mod split;

pub use config::TrainerConfig;
pub use dataset::{Dataset, DATASET_COLUMNS};
pub use encoder::LabelEncoder;
pub use metrics::{accuracy, AverageMetrics, ClassMetrics, ClassificationReport};
pub use split::{stratified_split, Split};

use inference_engine::{InferenceError, ModelArtifact, RandomForest};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use vitals::FEATURE_NAMES;

/// Trainer errors
#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Cannot read dataset {path}: {message}")]
    Dataset { path: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: {message}")]
    InvalidRow { line: u64, message: String },

    #[error("Dataset has no rows")]
    EmptyDataset,

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Test fraction must be in (0, 1), got {0}")]
    InvalidTestFraction(f64),

    #[error("Split left no rows for evaluation")]
    EmptyTestSet,

    #[error("Model error: {0}")]
    Model(#[from] InferenceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a training run, also written as JSON
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    /// `(label, index)` in encoder order
    pub label_mapping: Vec<(String, usize)>,
    pub feature_names: Vec<String>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub accuracy: f64,
    pub classification: ClassificationReport,
    pub model_path: PathBuf,
}

/// Load the configured dataset, train, save the artifact and report
pub fn train(config: &TrainerConfig) -> Result<TrainingReport, TrainerError> {
    let dataset = Dataset::load(&config.dataset_path)?;
    let report = train_on(&dataset, config)?;

    if let Some(path) = &config.report_path {
        write_report(&report, path)?;
    }
    Ok(report)
}

/// Train on an in-memory dataset and save the artifact to `config.model_path`
pub fn train_on(dataset: &Dataset, config: &TrainerConfig) -> Result<TrainingReport, TrainerError> {
    let encoder = LabelEncoder::fit(&dataset.labels);
    let y = encoder.transform(&dataset.labels)?;
    info!("Encoded {} classes: {:?}", encoder.len(), encoder.classes());

    let split = stratified_split(&y, config.test_fraction, config.split_seed)?;
    let pick_x = |rows: &[usize]| rows.iter().map(|&i| dataset.features[i].clone()).collect::<Vec<_>>();
    let pick_y = |rows: &[usize]| rows.iter().map(|&i| y[i]).collect::<Vec<_>>();

    let (x_train, y_train) = (pick_x(&split.train), pick_y(&split.train));
    let (x_test, y_test) = (pick_x(&split.test), pick_y(&split.test));
    info!("Split {} train / {} test rows", x_train.len(), x_test.len());

    let forest = RandomForest::fit(&x_train, &y_train, encoder.len(), &config.forest)?;

    let predicted = x_test
        .iter()
        .map(|row| forest.predict(row))
        .collect::<Result<Vec<_>, _>>()?;
    let classification = ClassificationReport::new(&y_test, &predicted, encoder.classes());
    info!("Hold-out accuracy: {:.4}", classification.accuracy);

    let feature_names: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
    let artifact = ModelArtifact::new(feature_names.clone(), encoder.classes().to_vec(), forest);
    artifact.save(&config.model_path)?;
    info!("Saved model artifact to {}", config.model_path.display());

    Ok(TrainingReport {
        label_mapping: encoder.mapping().map(|(l, i)| (l.to_string(), i)).collect(),
        feature_names,
        train_rows: x_train.len(),
        test_rows: x_test.len(),
        accuracy: classification.accuracy,
        classification,
        model_path: config.model_path.clone(),
    })
}

/// Write the report as pretty JSON, creating the parent directory
pub fn write_report(report: &TrainingReport, path: &Path) -> Result<(), TrainerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(report)?)?;
    info!("Wrote training report to {}", path.display());
    Ok(())
}
