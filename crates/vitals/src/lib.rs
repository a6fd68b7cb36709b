//! Vital Signs
//!
//! Provides the six-field vital reading, the status label vocabulary, feature
//! vector assembly for classifiers, and plausibility range checking.

mod error;
mod features;
mod reading;
mod status;
mod validator;

pub use error::VitalsError;
pub use features::{FeatureSet, FeatureVector, FEATURE_NAMES, LEGACY_FEATURE_COUNT};
pub use reading::VitalReading;
pub use status::StatusLabel;
pub use validator::{ValidationConfig, ValidationResult, Validator};
