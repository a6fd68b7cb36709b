//! Health Status Predictor
//!
//! Per-request prediction: parse six vitals, run the persisted model if one
//! can be found, otherwise score the vitals with the threshold rule.

pub mod config;
pub mod orchestrator;

pub use config::{ModelConfig, PredictorConfig, PredictorError, CONFIG_FILE, ENV_PREFIX};
pub use orchestrator::{Decision, FallbackReason, PredictionOutcome, Predictor};

/// Number of positional vitals on the command line
pub const REQUIRED_ARGS: usize = 6;

/// Usage line printed when arguments are missing
pub const USAGE: &str =
    "Usage: predict-health <age> <heartRate> <temperature> <oxygen> <bp_sys> <bp_dia>";
