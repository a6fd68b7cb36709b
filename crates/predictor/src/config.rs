//! Predictor configuration

use inference_engine::{ModelLocator, DEFAULT_CANDIDATES};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use vitals::ValidationConfig;

/// Optional config file base name, looked up in the working directory
pub const CONFIG_FILE: &str = "health-predictor";

/// Environment variable prefix, e.g. `HEALTH_PREDICTOR__MODEL__SEARCH_ROOT`
pub const ENV_PREFIX: &str = "HEALTH_PREDICTOR";

/// Predictor errors
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Where to look for a model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory candidates are resolved against; the executable's directory when unset
    pub search_root: Option<PathBuf>,
    /// Candidate paths relative to the search root, in lookup order
    pub candidates: Vec<PathBuf>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            search_root: None,
            candidates: DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect(),
        }
    }
}

/// Predictor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// `tracing` max level
    pub log_level: String,
    pub model: ModelConfig,
    pub validation: ValidationConfig,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            model: ModelConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl PredictorConfig {
    /// Load `health-predictor.*` then `HEALTH_PREDICTOR__*` over the defaults
    pub fn load() -> Result<Self, PredictorError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from a specific (optional) config file then the environment
    pub fn load_from(file: &str) -> Result<Self, PredictorError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("model.candidates"),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Locator over the configured root and candidates
    pub fn locator(&self) -> ModelLocator {
        let root = self
            .model
            .search_root
            .clone()
            .unwrap_or_else(ModelLocator::executable_dir);
        ModelLocator::new(root, self.model.candidates.clone())
    }
}
