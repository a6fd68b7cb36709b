//! Rule-Based Fallback System
//!
//! Scores vital signs against fixed clinical thresholds when no trained model
//! is available or usable.

mod rules;

pub use rules::{FallbackEngine, SeverityScore, CRITICAL_SCORE, WARNING_SCORE};
