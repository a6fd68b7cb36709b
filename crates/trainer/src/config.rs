//! Trainer configuration

use crate::TrainerError;
use inference_engine::ForestParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Optional config file base name, looked up in the working directory
pub const CONFIG_FILE: &str = "health-trainer";

/// Environment variable prefix, e.g. `HEALTH_TRAINER__FOREST__N_TREES=500`
pub const ENV_PREFIX: &str = "HEALTH_TRAINER";

/// Trainer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Labeled CSV dataset
    pub dataset_path: PathBuf,
    /// Where the fitted artifact is written
    pub model_path: PathBuf,
    /// JSON training report, skipped when unset
    pub report_path: Option<PathBuf>,
    /// Share of each class held out for evaluation
    pub test_fraction: f64,
    /// Seed for the stratified split
    pub split_seed: u64,
    /// Forest hyperparameters
    pub forest: ForestParams,
    /// `tracing` max level
    pub log_level: String,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("data/health_data.csv"),
            model_path: PathBuf::from("app/model.bin"),
            report_path: Some(PathBuf::from("app/training_report.json")),
            test_fraction: 0.2,
            split_seed: 42,
            forest: ForestParams::default(),
            log_level: "info".to_string(),
        }
    }
}

impl TrainerConfig {
    /// Load `health-trainer.*` then `HEALTH_TRAINER__*` over the defaults
    pub fn load() -> Result<Self, TrainerError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from a specific (optional) config file then the environment
    pub fn load_from(file: &str) -> Result<Self, TrainerError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
