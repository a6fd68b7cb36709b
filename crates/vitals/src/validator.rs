//! Plausibility Range Checking

use crate::error::VitalsError;
use crate::reading::VitalReading;
use serde::{Deserialize, Serialize};

/// Plausible physiological ranges
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Age valid range (years)
    pub age_range: (f64, f64),
    /// Heart rate valid range (beats/min)
    pub heart_rate_range: (f64, f64),
    /// Temperature valid range (°F)
    pub temperature_range: (f64, f64),
    /// Oxygen saturation valid range (%)
    pub oxygen_range: (f64, f64),
    /// Systolic pressure valid range (mmHg)
    pub bp_sys_range: (f64, f64),
    /// Diastolic pressure valid range (mmHg)
    pub bp_dia_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            age_range: (0.0, 130.0),
            heart_rate_range: (0.0, 300.0),
            temperature_range: (80.0, 115.0),
            oxygen_range: (0.0, 100.0),
            bp_sys_range: (0.0, 300.0),
            bp_dia_range: (0.0, 200.0),
        }
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are plausible
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<VitalsError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

/// Range checker for vital readings.
///
/// Readings outside these ranges are still scored; the checker only reports them.
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), VitalsError> {
        if value.is_nan() || value < range.0 || value > range.1 {
            Err(VitalsError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate every field of a reading
    pub fn validate(&self, reading: &VitalReading) -> ValidationResult {
        let checks = [
            ("age", reading.age, self.config.age_range),
            ("heartRate", reading.heart_rate, self.config.heart_rate_range),
            ("temperature", reading.temperature, self.config.temperature_range),
            ("oxygen", reading.oxygen, self.config.oxygen_range),
            ("bp_sys", reading.bp_sys, self.config.bp_sys_range),
            ("bp_dia", reading.bp_dia, self.config.bp_dia_range),
        ];

        let errors: Vec<VitalsError> = checks
            .iter()
            .filter_map(|&(field, value, range)| self.validate_range(field, value, range).err())
            .collect();

        ValidationResult {
            valid: errors.is_empty(),
            errors,
            fields_checked: checks.len(),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
