//! Feature Vector Assembly

use crate::error::VitalsError;
use crate::reading::VitalReading;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Feature names in canonical order, matching the training dataset columns
pub const FEATURE_NAMES: [&str; 6] = ["age", "heartRate", "temperature", "oxygen", "bp_sys", "bp_dia"];

/// Number of leading features accepted by models trained before blood pressure was recorded
pub const LEGACY_FEATURE_COUNT: usize = 4;

/// Which subset of features was fed to a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureSet {
    /// All six vitals
    Full,
    /// Age, heart rate, temperature and oxygen only
    Legacy,
}

impl FeatureSet {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureSet::Full => "full",
            FeatureSet::Legacy => "legacy",
        }
    }
}

/// Single-row feature input for a classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Column names, parallel to `values`
    names: Vec<String>,
    /// Feature values
    values: Vec<f64>,
}

impl FeatureVector {
    /// Build the canonical six-feature row from a reading
    pub fn from_reading(reading: &VitalReading) -> Self {
        Self {
            names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            values: reading.to_array().to_vec(),
        }
    }

    /// Build a row from explicit names and values of equal length
    pub fn new(names: Vec<String>, values: Vec<f64>) -> Result<Self, VitalsError> {
        if names.len() != values.len() {
            return Err(VitalsError::LengthMismatch {
                names: names.len(),
                values: values.len(),
            });
        }
        Ok(Self { names, values })
    }

    /// Reorder columns to match the order a model expects, by name
    pub fn reorder(&self, expected: &[String]) -> Result<FeatureVector, VitalsError> {
        let mut values = Vec::with_capacity(expected.len());
        for name in expected {
            let idx = self
                .names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| VitalsError::UnknownFeature(name.clone()))?;
            values.push(self.values[idx]);
        }

        debug!("Reordered features to {:?}", expected);
        Ok(FeatureVector {
            names: expected.to_vec(),
            values,
        })
    }

    /// Keep only the leading legacy features
    pub fn legacy(&self) -> FeatureVector {
        let n = LEGACY_FEATURE_COUNT.min(self.values.len());
        FeatureVector {
            names: self.names[..n].to_vec(),
            values: self.values[..n].to_vec(),
        }
    }

    /// Column names
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Feature values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
