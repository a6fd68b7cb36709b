//! Stratified train/test split

use crate::TrainerError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Row indices for each side of a split
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split row indices so every class keeps its proportion in the test set.
///
/// Each class contributes `round(count * test_fraction)` rows to the test
/// side, but always leaves at least one row for training.
pub fn stratified_split(
    labels: &[usize],
    test_fraction: f64,
    seed: u64,
) -> Result<Split, TrainerError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TrainerError::InvalidTestFraction(test_fraction));
    }

    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (row, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(row);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut split = Split {
        train: Vec::with_capacity(labels.len()),
        test: Vec::new(),
    };

    for rows in by_class.values_mut() {
        rows.shuffle(&mut rng);
        let n_test = ((rows.len() as f64 * test_fraction).round() as usize).min(rows.len() - 1);
        split.test.extend_from_slice(&rows[..n_test]);
        split.train.extend_from_slice(&rows[n_test..]);
    }

    split.train.shuffle(&mut rng);
    split.test.shuffle(&mut rng);

    if split.test.is_empty() {
        return Err(TrainerError::EmptyTestSet);
    }
    Ok(split)
}
