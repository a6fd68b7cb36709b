//! Threshold Scoring Rules

use serde::{Deserialize, Serialize};
use tracing::debug;
use vitals::{StatusLabel, VitalReading};

/// Minimum total score classified as Critical
pub const CRITICAL_SCORE: u32 = 6;
/// Minimum total score classified as Warning
pub const WARNING_SCORE: u32 = 3;

/// Per-vital contributions to the severity score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityScore {
    pub heart_rate: u32,
    pub temperature: u32,
    pub oxygen: u32,
    pub blood_pressure: u32,
    pub age: u32,
}

impl SeverityScore {
    /// Sum of all contributions
    pub fn total(&self) -> u32 {
        self.heart_rate + self.temperature + self.oxygen + self.blood_pressure + self.age
    }
}

/// Deterministic fallback scorer.
///
/// Each vital contributes at most one bucket; the most severe matching
/// condition wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEngine;

impl FallbackEngine {
    /// Create a new fallback engine
    pub fn new() -> Self {
        Self
    }

    /// Score a reading
    pub fn score(&self, reading: &VitalReading) -> SeverityScore {
        SeverityScore {
            heart_rate: heart_rate_points(reading.heart_rate),
            temperature: temperature_points(reading.temperature),
            oxygen: oxygen_points(reading.oxygen),
            blood_pressure: blood_pressure_points(reading.bp_sys, reading.bp_dia),
            age: age_points(reading.age),
        }
    }

    /// Map a total score onto a status label
    pub fn classify(&self, total: u32) -> StatusLabel {
        if total >= CRITICAL_SCORE {
            StatusLabel::Critical
        } else if total >= WARNING_SCORE {
            StatusLabel::Warning
        } else {
            StatusLabel::Normal
        }
    }

    /// Score and classify a reading
    pub fn evaluate(&self, reading: &VitalReading) -> StatusLabel {
        let score = self.score(reading);
        let label = self.classify(score.total());
        debug!("Fallback score {:?} (total {}) -> {}", score, score.total(), label);
        label
    }

    /// Evaluate raw string inputs; anything unparseable is Normal
    pub fn evaluate_raw<S: AsRef<str>>(&self, raw: &[S]) -> StatusLabel {
        match VitalReading::parse(raw) {
            Ok(reading) => self.evaluate(&reading),
            Err(e) => {
                debug!("Fallback input rejected: {}", e);
                StatusLabel::Normal
            }
        }
    }
}

fn heart_rate_points(hr: f64) -> u32 {
    if hr >= 140.0 || hr <= 30.0 {
        3
    } else if hr >= 110.0 || hr <= 40.0 {
        2
    } else if hr >= 100.0 {
        1
    } else {
        0
    }
}

fn temperature_points(temp: f64) -> u32 {
    if temp >= 104.0 || temp <= 92.0 {
        3
    } else if temp >= 102.0 || temp <= 94.0 {
        2
    } else if temp >= 100.0 {
        1
    } else {
        0
    }
}

fn oxygen_points(ox: f64) -> u32 {
    if ox < 85.0 {
        4
    } else if ox < 90.0 {
        2
    } else if ox < 94.0 {
        1
    } else {
        0
    }
}

fn blood_pressure_points(sys: f64, dia: f64) -> u32 {
    if sys >= 180.0 || dia >= 120.0 {
        3
    } else if sys >= 160.0 || dia >= 100.0 {
        2
    } else {
        0
    }
}

fn age_points(age: f64) -> u32 {
    if age >= 75.0 {
        1
    } else {
        0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn vitals() -> impl Strategy<Value = [f64; 6]> {
        (
            0.0f64..120.0,
            0.0f64..250.0,
            85.0f64..110.0,
            50.0f64..100.0,
            60.0f64..250.0,
            30.0f64..160.0,
        )
            .prop_map(|(a, b, c, d, e, f)| [a, b, c, d, e, f])
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_always_one_of_three(values in prop::array::uniform6(any::<f64>())) {
            let label = FallbackEngine::new().evaluate(&VitalReading::from_array(values));
            prop_assert!(StatusLabel::ALL.contains(&label));
        }

        #[test]
        fn prop_higher_heart_rate_never_lowers_score(values in vitals(), bump in 0.0f64..100.0) {
            let engine = FallbackEngine::new();
            let base = VitalReading::from_array(values);
            // Only the tachycardic side is monotone; bradycardia scores by its own buckets.
            prop_assume!(base.heart_rate >= 100.0);
            let worse = VitalReading { heart_rate: base.heart_rate + bump, ..base };
            prop_assert!(engine.score(&worse).total() >= engine.score(&base).total());
        }

        #[test]
        fn prop_higher_fever_never_lowers_score(values in vitals(), bump in 0.0f64..10.0) {
            let engine = FallbackEngine::new();
            let base = VitalReading::from_array(values);
            prop_assume!(base.temperature >= 100.0);
            let worse = VitalReading { temperature: base.temperature + bump, ..base };
            prop_assert!(engine.score(&worse).total() >= engine.score(&base).total());
        }

        #[test]
        fn prop_lower_oxygen_never_lowers_score(values in vitals(), drop in 0.0f64..50.0) {
            let engine = FallbackEngine::new();
            let base = VitalReading::from_array(values);
            let worse = VitalReading { oxygen: base.oxygen - drop, ..base };
            prop_assert!(engine.score(&worse).total() >= engine.score(&base).total());
        }

        #[test]
        fn prop_higher_pressure_never_lowers_score(
            values in vitals(),
            sys_bump in 0.0f64..80.0,
            dia_bump in 0.0f64..60.0,
        ) {
            let engine = FallbackEngine::new();
            let base = VitalReading::from_array(values);
            let worse = VitalReading {
                bp_sys: base.bp_sys + sys_bump,
                bp_dia: base.bp_dia + dia_bump,
                ..base
            };
            prop_assert!(engine.score(&worse).total() >= engine.score(&base).total());
        }

        #[test]
        fn prop_evaluate_is_deterministic(values in vitals()) {
            let engine = FallbackEngine::new();
            let reading = VitalReading::from_array(values);
            prop_assert_eq!(engine.evaluate(&reading), engine.evaluate(&reading));
        }
    }
}
