use crate::csv_reader::CsvData;
use crate::error::{KnotError, Result};

/// Numeric feature matrix extracted from CSV data
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    /// Feature names (column headers)
    pub names: Vec<String>,
    /// Row data as feature vectors
    pub data: Vec<Vec<f64>>,
    /// Original row indices (for mapping back)
    pub row_indices: Vec<usize>,
}

impl FeatureMatrix {
    /// Extract numeric features from CSV data
    ///
    /// Rows with missing or non-numeric entries in a numeric column are
    /// skipped; the table must keep at least 2 features and 2 complete rows.
    ///
    /// # Errors
    /// Returns `InvalidInputTable` if fewer than 2 numeric columns are found
    /// or fewer than 2 complete rows survive.
    pub fn from_csv(csv: &CsvData) -> Result<Self> {
        let numeric_cols = csv.numeric_column_indices();

        if numeric_cols.len() < 2 {
            return Err(KnotError::InvalidInputTable(format!(
                "need at least 2 numeric columns, found {}",
                numeric_cols.len()
            )));
        }

        let names: Vec<String> = numeric_cols
            .iter()
            .filter_map(|&i| csv.headers.get(i).cloned())
            .collect();

        let mut data = Vec::new();
        let mut row_indices = Vec::new();

        for (row_idx, row) in csv.rows.iter().enumerate() {
            let mut values = Vec::with_capacity(numeric_cols.len());
            let mut valid = true;

            for &col_idx in &numeric_cols {
                match row.get(col_idx).and_then(|v| v.parse::<f64>().ok()) {
                    Some(num) if num.is_finite() => values.push(num),
                    _ => {
                        valid = false;
                        break;
                    }
                }
            }

            if valid && values.len() == numeric_cols.len() {
                data.push(values);
                row_indices.push(row_idx);
            }
        }

        if data.len() < 2 {
            return Err(KnotError::InvalidInputTable(format!(
                "need at least 2 complete numeric rows, found {}",
                data.len()
            )));
        }

        Ok(Self {
            names,
            data,
            row_indices,
        })
    }

    /// Get number of samples (rows)
    #[allow(dead_code)]
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.data.len()
    }

    /// Get number of features (columns)
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.names.len()
    }

    /// Get a feature column by index
    #[must_use]
    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.n_features() {
            return None;
        }
        Some(self.data.iter().map(|row| row[index]).collect())
    }
}
