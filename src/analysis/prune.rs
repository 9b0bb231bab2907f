//! Sigma-threshold pruning of the correlation matrix

use crate::analysis::correlation::CorrelationMatrix;

/// Correlation matrix with entries below the sigma threshold zeroed.
///
/// Surviving entries are rounded to 3 decimal places for display stability;
/// the threshold comparison itself runs on the unrounded values.
#[derive(Debug, Clone)]
pub struct PrunedMatrix {
    pub names: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    pub sigma: f64,
}

impl PrunedMatrix {
    /// Surviving weight between two named features (0.0 when pruned)
    #[must_use]
    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == a)?;
        let j = self.names.iter().position(|n| n == b)?;
        Some(self.matrix[i][j])
    }
}

/// Compute the pruning threshold: the midpoint between the maximum and mean
/// absolute off-diagonal correlation. Undefined (NaN) entries are excluded.
#[allow(clippy::cast_precision_loss)]
fn sigma_threshold(matrix: &[Vec<f64>]) -> f64 {
    let n = matrix.len();
    let mut max_abs = 0.0_f64;
    let mut sum_abs = 0.0_f64;
    let mut count = 0usize;

    for i in 0..n {
        for j in (i + 1)..n {
            let v = matrix[i][j].abs();
            if v.is_finite() {
                max_abs = max_abs.max(v);
                sum_abs += v;
                count += 1;
            }
        }
    }

    if count == 0 {
        return 0.0;
    }

    let mean_abs = sum_abs / count as f64;
    (max_abs + mean_abs) / 2.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Zero every off-diagonal entry whose magnitude is below the sigma
/// threshold. NaN entries (undefined correlations) become absent edges.
///
/// Two sequential passes: compute the threshold over all off-diagonal
/// magnitudes, then filter the matrix by it. Pure and deterministic.
#[must_use]
pub fn prune(corr: &CorrelationMatrix) -> PrunedMatrix {
    let n = corr.names.len();
    let sigma = sigma_threshold(&corr.matrix);

    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = corr.matrix[i][j];
            if r.is_finite() && r.abs() >= sigma {
                let rounded = round3(r);
                matrix[i][j] = rounded;
                matrix[j][i] = rounded;
            }
        }
    }

    PrunedMatrix {
        names: corr.names.clone(),
        matrix,
        sigma,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_of(names: &[&str], entries: Vec<Vec<f64>>) -> CorrelationMatrix {
        CorrelationMatrix {
            names: names.iter().map(|s| (*s).to_string()).collect(),
            matrix: entries,
            undefined: Vec::new(),
        }
    }

    #[test]
    fn test_sigma_between_mean_and_max() {
        let corr = matrix_of(
            &["a", "b", "c"],
            vec![
                vec![1.0, 0.9, 0.1],
                vec![0.9, 1.0, 0.5],
                vec![0.1, 0.5, 1.0],
            ],
        );
        let pruned = prune(&corr);

        let mean = (0.9 + 0.1 + 0.5) / 3.0;
        assert!(pruned.sigma >= mean);
        assert!(pruned.sigma <= 0.9);
        assert!((pruned.sigma - (0.9 + mean) / 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_weak_entries_zeroed_and_symmetric() {
        let corr = matrix_of(
            &["a", "b", "c"],
            vec![
                vec![1.0, 0.9, 0.1],
                vec![0.9, 1.0, 0.5],
                vec![0.1, 0.5, 1.0],
            ],
        );
        let pruned = prune(&corr);

        // sigma = (0.9 + 0.5) / 2 = 0.7: only the 0.9 entry survives
        assert!((pruned.matrix[0][1] - 0.9).abs() < 1e-10);
        assert_eq!(pruned.matrix[0][2], 0.0);
        assert_eq!(pruned.matrix[1][2], 0.0);
        for i in 0..3 {
            for j in 0..3 {
                assert!((pruned.matrix[i][j] - pruned.matrix[j][i]).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_all_equal_boundary() {
        // When every off-diagonal magnitude is equal, sigma equals that
        // magnitude and everything survives
        let corr = matrix_of(
            &["a", "b", "c"],
            vec![
                vec![1.0, 0.6, 0.6],
                vec![0.6, 1.0, 0.6],
                vec![0.6, 0.6, 1.0],
            ],
        );
        let pruned = prune(&corr);

        assert!((pruned.sigma - 0.6).abs() < 1e-10);
        assert!((pruned.matrix[0][1] - 0.6).abs() < 1e-10);
        assert!((pruned.matrix[0][2] - 0.6).abs() < 1e-10);
        assert!((pruned.matrix[1][2] - 0.6).abs() < 1e-10);
    }

    #[test]
    fn test_nan_entries_become_absent() {
        let corr = matrix_of(
            &["a", "b", "c"],
            vec![
                vec![1.0, f64::NAN, 0.8],
                vec![f64::NAN, 1.0, 0.8],
                vec![0.8, 0.8, 1.0],
            ],
        );
        let pruned = prune(&corr);

        assert_eq!(pruned.matrix[0][1], 0.0);
        assert!((pruned.sigma - 0.8).abs() < 1e-10);
        assert!((pruned.matrix[0][2] - 0.8).abs() < 1e-10);
    }

    #[test]
    fn test_survivors_rounded() {
        let corr = matrix_of(
            &["a", "b"],
            vec![vec![1.0, 0.87654], vec![0.87654, 1.0]],
        );
        let pruned = prune(&corr);

        assert!((pruned.matrix[0][1] - 0.877).abs() < 1e-10);
    }

    #[test]
    fn test_negative_correlations_kept_signed() {
        let corr = matrix_of(
            &["a", "b", "c"],
            vec![
                vec![1.0, -0.9, 0.2],
                vec![-0.9, 1.0, 0.2],
                vec![0.2, 0.2, 1.0],
            ],
        );
        let pruned = prune(&corr);

        // Magnitude decides survival, sign is preserved
        assert!((pruned.matrix[0][1] + 0.9).abs() < 1e-10);
        assert_eq!(pruned.matrix[0][2], 0.0);
    }
}
