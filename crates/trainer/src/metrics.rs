//! Classification Metrics

use serde::Serialize;
use std::fmt;

/// Fraction of predictions equal to the truth
pub fn accuracy(truth: &[usize], predicted: &[usize]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    correct as f64 / truth.len() as f64
}

/// Precision, recall and F1 for one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Averaged metrics over all classes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class summary with macro and support-weighted averages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
}

impl ClassificationReport {
    /// Build the report; undefined ratios are reported as 0
    pub fn new(truth: &[usize], predicted: &[usize], labels: &[String]) -> Self {
        let n_classes = labels.len();
        let mut true_pos = vec![0usize; n_classes];
        let mut pred_count = vec![0usize; n_classes];
        let mut support = vec![0usize; n_classes];

        for (&t, &p) in truth.iter().zip(predicted) {
            if t < n_classes {
                support[t] += 1;
            }
            if p < n_classes {
                pred_count[p] += 1;
            }
            if t == p && t < n_classes {
                true_pos[t] += 1;
            }
        }

        let classes: Vec<ClassMetrics> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let precision = ratio(true_pos[i], pred_count[i]);
                let recall = ratio(true_pos[i], support[i]);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics {
                    label: label.clone(),
                    precision,
                    recall,
                    f1,
                    support: support[i],
                }
            })
            .collect();

        let total: usize = support.iter().sum();
        let macro_avg = average(&classes, total, |_| 1.0 / n_classes.max(1) as f64);
        let weighted_avg = average(&classes, total, |c| ratio(c.support, total));

        Self {
            classes,
            accuracy: accuracy(truth, predicted),
            macro_avg,
            weighted_avg,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn average(classes: &[ClassMetrics], support: usize, weight: impl Fn(&ClassMetrics) -> f64) -> AverageMetrics {
    let mut avg = AverageMetrics {
        precision: 0.0,
        recall: 0.0,
        f1: 0.0,
        support,
    };
    for class in classes {
        let w = weight(class);
        avg.precision += w * class.precision;
        avg.recall += w * class.recall;
        avg.f1 += w * class.f1;
    }
    avg
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.len())
            .chain(["weighted avg".len()])
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, avg.support
            )?;
        }
        Ok(())
    }
}
