//! Vitals Error Types

use thiserror::Error;

/// Errors while reading or reshaping vitals
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VitalsError {
    /// Value is not a number
    #[error("{field} value {value:?} is not a number")]
    InvalidNumber { field: &'static str, value: String },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Value outside the plausible physiological range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Model asked for a feature the vector does not carry
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// Names and values of a feature row differ in length
    #[error("Feature row has {names} names but {values} values")]
    LengthMismatch { names: usize, values: usize },
}
