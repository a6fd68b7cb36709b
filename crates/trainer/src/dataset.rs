//! Training Dataset Loading

use crate::TrainerError;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Dataset columns in file order; the header row is not trusted
pub const DATASET_COLUMNS: [&str; 7] = [
    "age",
    "heartRate",
    "temperature",
    "oxygen",
    "bp_sys",
    "bp_dia",
    "status",
];

/// One CSV row, bound by position
#[derive(Debug, Deserialize)]
struct DatasetRow {
    age: f64,
    heart_rate: f64,
    temperature: f64,
    oxygen: f64,
    bp_sys: f64,
    bp_dia: f64,
    status: String,
}

/// Labeled vitals
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Feature rows in canonical vital order
    pub features: Vec<Vec<f64>>,
    /// Status label per row
    pub labels: Vec<String>,
}

impl Dataset {
    /// Load a dataset from a CSV file
    pub fn load(path: &Path) -> Result<Self, TrainerError> {
        let file = File::open(path).map_err(|e| TrainerError::Dataset {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let dataset = Self::from_reader(file)?;
        info!("Loaded {} rows from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Parse CSV with a header row and exactly seven columns
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TrainerError> {
        let mut rows = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut dataset = Dataset::default();
        for record in rows.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            if record.len() != DATASET_COLUMNS.len() {
                return Err(TrainerError::ColumnCount {
                    line,
                    expected: DATASET_COLUMNS.len(),
                    found: record.len(),
                });
            }

            let row: DatasetRow = record.deserialize(None).map_err(|e| TrainerError::InvalidRow {
                line,
                message: e.to_string(),
            })?;
            let features = vec![
                row.age,
                row.heart_rate,
                row.temperature,
                row.oxygen,
                row.bp_sys,
                row.bp_dia,
            ];
            if let Some(pos) = features.iter().position(|v| !v.is_finite()) {
                return Err(TrainerError::InvalidRow {
                    line,
                    message: format!("{} is not finite", DATASET_COLUMNS[pos]),
                });
            }

            dataset.features.push(features);
            dataset.labels.push(row.status);
        }

        if dataset.is_empty() {
            return Err(TrainerError::EmptyDataset);
        }
        Ok(dataset)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_bound_by_position() {
        let csv = "\
Age,HR,Temp,SpO2,Sys,Dia,Label
70,150,104.2,85,180,100,Critical
30,80,98.6,98,120,80,Normal
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.features[0], vec![70.0, 150.0, 104.2, 85.0, 180.0, 100.0]);
        assert_eq!(dataset.labels, vec!["Critical", "Normal"]);
    }

    #[test]
    fn test_whitespace_trimmed() {
        let csv = "a,b,c,d,e,f,g\n 80 , 105 ,100.5,93,165,95, Warning \n";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(dataset.labels, vec!["Warning"]);
        assert_eq!(dataset.features[0][0], 80.0);
    }

    #[test]
    fn test_wrong_column_count() {
        let csv = "a,b,c,d,e,f,g\n70,150,104.2,85,180,Critical\n";
        match Dataset::from_reader(csv.as_bytes()) {
            Err(TrainerError::ColumnCount { line, expected, found }) => {
                assert_eq!(line, 2);
                assert_eq!(expected, 7);
                assert_eq!(found, 6);
            }
            other => panic!("expected column count error, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_number() {
        let csv = "a,b,c,d,e,f,g\n70,fast,104.2,85,180,100,Critical\n";
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(TrainerError::InvalidRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let csv = "a,b,c,d,e,f,g\n70,NaN,104.2,85,180,100,Critical\n";
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(TrainerError::InvalidRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_header_only() {
        let csv = "a,b,c,d,e,f,g\n";
        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(TrainerError::EmptyDataset)
        ));
    }
}
