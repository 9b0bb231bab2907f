use crate::error::{KnotError, Result};

/// Convert values to ranks (average rank for ties)
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn to_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();

    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let mut i = 0;

    while i < n {
        let mut j = i;

        // Group elements with the same value (ties)
        while j < n && (indexed[j].1 - indexed[i].1).abs() < 1e-10 {
            j += 1;
        }

        let avg_rank = (i + j + 1) as f64 / 2.0;
        for k in i..j {
            ranks[indexed[k].0] = avg_rank;
        }

        i = j;
    }

    ranks
}

/// Spearman rank correlation between two feature columns.
///
/// Returns `Ok(None)` when either column has zero variance: the correlation
/// is undefined there and must not be silently reported as 0.
///
/// # Errors
/// Returns error if the vectors have different lengths or fewer than 2 values
pub fn spearman(x: &[f64], y: &[f64]) -> Result<Option<f64>> {
    if x.len() != y.len() {
        return Err(KnotError::InvalidInputTable(
            "columns must have the same length".into(),
        ));
    }
    if x.len() < 2 {
        return Err(KnotError::InvalidInputTable(
            "need at least 2 values for correlation".into(),
        ));
    }

    let rank_x = to_ranks(x);
    let rank_y = to_ranks(y);

    Ok(pearson_on(&rank_x, &rank_y))
}

/// Pearson correlation; `None` when either input has zero variance.
#[allow(clippy::cast_precision_loss)]
fn pearson_on(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for i in 0..x.len() {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }

    Some(cov / denom)
}
