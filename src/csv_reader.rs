use crate::error::Result;
use csv::ReaderBuilder;
use std::path::Path;

/// Represents a parsed CSV/TSV file with headers and rows
#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvData {
    /// Parse a CSV or TSV file. The first row is taken as feature names.
    pub fn from_file(path: &Path, is_tsv: bool) -> Result<Self> {
        let delimiter = if is_tsv { b'\t' } else { b',' };

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            rows.push(row);
        }

        Ok(CsvData { headers, rows })
    }

    /// Get number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.headers.len()
    }

    /// Get a column as a vector of strings
    #[must_use]
    pub fn column(&self, index: usize) -> Option<Vec<&str>> {
        if index >= self.headers.len() {
            return None;
        }
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(index).map(String::as_str))
                .collect(),
        )
    }

    /// Find columns that contain numeric data
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn numeric_column_indices(&self) -> Vec<usize> {
        (0..self.col_count())
            .filter(|&i| {
                self.column(i).is_some_and(|col| {
                    // Consider numeric if at least 50% of non-empty values parse as numbers
                    let non_empty: Vec<_> = col.iter().filter(|s| !s.is_empty()).collect();
                    if non_empty.is_empty() {
                        return false;
                    }
                    let numeric_count = non_empty
                        .iter()
                        .filter(|s| s.parse::<f64>().is_ok())
                        .count();
                    numeric_count as f64 / non_empty.len() as f64 >= 0.5
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_csv() {
        let csv_content = "name,value,count\nalpha,1.5,10\nbeta,2.5,20\ngamma,3.5,30";
        let file = create_test_csv(csv_content);

        let data = CsvData::from_file(file.path(), false).unwrap();

        assert_eq!(data.headers, vec!["name", "value", "count"]);
        assert_eq!(data.row_count(), 3);
        assert_eq!(data.col_count(), 3);
    }

    #[test]
    fn test_parse_tsv() {
        let tsv_content = "a\tb\n1.0\t2.0\n3.0\t4.0";
        let file = create_test_csv(tsv_content);

        let data = CsvData::from_file(file.path(), true).unwrap();

        assert_eq!(data.headers, vec!["a", "b"]);
        assert_eq!(data.row_count(), 2);
    }

    #[test]
    fn test_numeric_columns() {
        let csv_content = "name,value,count\nalpha,1.5,10\nbeta,2.5,20\ngamma,3.5,30";
        let file = create_test_csv(csv_content);

        let data = CsvData::from_file(file.path(), false).unwrap();
        let numeric = data.numeric_column_indices();

        // "value" and "count" should be numeric
        assert_eq!(numeric, vec![1, 2]);
    }
}
