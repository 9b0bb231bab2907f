//! Pairwise Spearman correlation matrix

use crate::analysis::features::FeatureMatrix;
use crate::analysis::stats::spearman;
use crate::error::Result;

/// Symmetric `NxN` rank-correlation matrix between all numeric features.
///
/// Undefined entries (zero-variance pairs) are stored as NaN and listed in
/// `undefined` so callers can report them per pair.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    pub undefined: Vec<(String, String)>,
}

impl CorrelationMatrix {
    /// Look up the correlation between two named features
    #[allow(dead_code)]
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.matrix[i][j])
    }
}

/// Compute the Spearman correlation matrix between all numeric features
///
/// # Errors
/// Returns error if the columns are structurally unusable (length mismatch,
/// fewer than 2 samples). Zero-variance pairs are recorded, not errors.
pub fn correlation_matrix(features: &FeatureMatrix) -> Result<CorrelationMatrix> {
    let n = features.n_features();
    let mut matrix = vec![vec![0.0; n]; n];
    let mut undefined = Vec::new();

    let columns: Vec<Vec<f64>> = (0..n)
        .filter_map(|i| features.column(i))
        .collect();

    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            match spearman(&columns[i], &columns[j])? {
                Some(r) => {
                    matrix[i][j] = r;
                    matrix[j][i] = r;
                }
                None => {
                    matrix[i][j] = f64::NAN;
                    matrix[j][i] = f64::NAN;
                    undefined.push((features.names[i].clone(), features.names[j].clone()));
                }
            }
        }
    }

    Ok(CorrelationMatrix {
        names: features.names.clone(),
        matrix,
        undefined,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::CsvData;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn features(content: &str) -> FeatureMatrix {
        let mut file = NamedTempFile::new().expect("create");
        file.write_all(content.as_bytes()).expect("write");
        let csv = CsvData::from_file(file.path(), false).expect("parse");
        FeatureMatrix::from_csv(&csv).expect("extract")
    }

    #[test]
    fn test_correlation_matrix() {
        let f = features("a,b,c\n1.0,2.0,30.0\n2.0,4.0,20.0\n3.0,6.0,10.0");
        let corr = correlation_matrix(&f).expect("correlate");

        assert_eq!(corr.names.len(), 3);
        // Diagonal is 1
        assert!((corr.matrix[0][0] - 1.0).abs() < 1e-10);
        // a and b are perfectly rank-correlated
        assert!((corr.matrix[0][1] - 1.0).abs() < 1e-10);
        // c decreases as a increases
        assert!((corr.matrix[0][2] + 1.0).abs() < 1e-10);
        // Symmetric
        assert!((corr.matrix[1][2] - corr.matrix[2][1]).abs() < 1e-10);
        assert!(corr.undefined.is_empty());
    }

    #[test]
    fn test_zero_variance_pair_recorded() {
        let f = features("a,b,c\n1.0,5.0,1.0\n2.0,5.0,2.0\n3.0,5.0,4.0");
        let corr = correlation_matrix(&f).expect("correlate");

        // b is constant: both pairs involving it are undefined
        assert!(corr.matrix[0][1].is_nan());
        assert!(corr.matrix[1][2].is_nan());
        assert_eq!(corr.undefined.len(), 2);
        assert!(corr
            .undefined
            .iter()
            .all(|(x, y)| x == "b" || y == "b"));
        // The a-c pair is still defined
        assert!(corr.matrix[0][2].is_finite());
    }

    #[test]
    fn test_get_by_name() {
        let f = features("a,b\n1.0,2.0\n2.0,4.0\n3.0,6.0");
        let corr = correlation_matrix(&f).expect("correlate");

        assert!((corr.get("a", "b").expect("present") - 1.0).abs() < 1e-10);
        assert!(corr.get("a", "missing").is_none());
    }
}
