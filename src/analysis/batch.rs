//! Batching arithmetic for the renderer boundary.
//!
//! Rendering is out of scope, but the partition of cycles into per-figure
//! batches is part of the output contract.

/// Split items into batches of at most `per_figure` entries
#[must_use]
pub fn partition<T>(items: &[T], per_figure: usize) -> Vec<&[T]> {
    if items.is_empty() {
        return Vec::new();
    }
    items.chunks(per_figure.max(1)).collect()
}

/// Number of batches needed for `total` items at `per_figure` per batch
#[must_use]
pub fn batch_count(total: usize, per_figure: usize) -> usize {
    if total == 0 {
        return 0;
    }
    total.div_ceil(per_figure.max(1))
}
