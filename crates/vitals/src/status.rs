//! Health Status Labels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Health status reported for a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusLabel {
    /// Vitals within expected ranges
    Normal,
    /// Some vitals need attention
    Warning,
    /// Immediate attention required
    Critical,
}

impl StatusLabel {
    /// All labels, ordered by class index
    pub const ALL: [StatusLabel; 3] = [StatusLabel::Normal, StatusLabel::Warning, StatusLabel::Critical];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Normal => "Normal",
            StatusLabel::Warning => "Warning",
            StatusLabel::Critical => "Critical",
        }
    }

    /// Map a numeric class returned by a model (0 → Normal, 1 → Warning, 2 → Critical)
    pub fn from_class_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(StatusLabel::Normal),
            1 => Some(StatusLabel::Warning),
            2 => Some(StatusLabel::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s.trim())
            .ok_or_else(|| format!("unknown status label: {}", s))
    }
}
