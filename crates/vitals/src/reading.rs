//! Vital Reading

use crate::error::VitalsError;
use crate::features::FEATURE_NAMES;
use serde::{Deserialize, Serialize};

/// One set of vital signs for a patient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalReading {
    /// Age (years)
    pub age: f64,
    /// Heart rate (beats/min)
    pub heart_rate: f64,
    /// Body temperature (°F)
    pub temperature: f64,
    /// Oxygen saturation (%)
    pub oxygen: f64,
    /// Systolic blood pressure (mmHg)
    pub bp_sys: f64,
    /// Diastolic blood pressure (mmHg)
    pub bp_dia: f64,
}

impl VitalReading {
    /// Parse a reading from six raw values in canonical order:
    /// age, heart rate, temperature, oxygen, systolic, diastolic.
    ///
    /// Values beyond the sixth are ignored.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, VitalsError> {
        let mut values = [0.0; 6];
        for (idx, &field) in FEATURE_NAMES.iter().enumerate() {
            let value = raw.get(idx).ok_or(VitalsError::MissingField(field))?;
            values[idx] = parse_field(field, value.as_ref())?;
        }
        Ok(Self::from_array(values))
    }

    /// Build a reading from values in canonical order
    pub fn from_array(values: [f64; 6]) -> Self {
        let [age, heart_rate, temperature, oxygen, bp_sys, bp_dia] = values;
        Self {
            age,
            heart_rate,
            temperature,
            oxygen,
            bp_sys,
            bp_dia,
        }
    }

    /// Values in canonical order
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.age,
            self.heart_rate,
            self.temperature,
            self.oxygen,
            self.bp_sys,
            self.bp_dia,
        ]
    }
}

fn parse_field(field: &'static str, raw: &str) -> Result<f64, VitalsError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| VitalsError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}
