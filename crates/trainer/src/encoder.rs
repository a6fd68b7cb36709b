//! Alphabetical label encoding

use crate::TrainerError;
use std::collections::BTreeSet;

/// Maps status strings to class indices in sorted order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the sorted set of distinct labels
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes: BTreeSet<&str> = labels.iter().map(|l| l.as_ref().trim()).collect();
        Self {
            classes: classes.into_iter().map(str::to_string).collect(),
        }
    }

    /// Index of every label
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>, TrainerError> {
        labels.iter().map(|l| self.index_of(l.as_ref())).collect()
    }

    /// Index of one label
    pub fn index_of(&self, label: &str) -> Result<usize, TrainerError> {
        let label = label.trim();
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| TrainerError::UnknownLabel(label.to_string()))
    }

    /// `(label, index)` pairs in index order
    pub fn mapping(&self) -> impl Iterator<Item = (&str, usize)> {
        self.classes.iter().enumerate().map(|(i, c)| (c.as_str(), i))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
