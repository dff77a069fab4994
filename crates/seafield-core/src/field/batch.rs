use super::{compute_distance_field_scaled, DistanceField, FieldError};
use crate::grid::{Cell, Grid};
use log::debug;
use rayon::prelude::*;

/// One field per source, computed in parallel over the shared grid.
///
/// Results keep the order of `sources`; a bad source only fails its own entry.
pub fn compute_distance_fields(
    grid: &Grid,
    sources: &[Cell],
    scale: f64,
) -> Vec<Result<DistanceField, FieldError>> {
    debug!(
        "computing {} distance fields on a {}x{} grid",
        sources.len(),
        grid.rows(),
        grid.cols()
    );
    sources
        .par_iter()
        .map(|&source| compute_distance_field_scaled(grid, source, scale))
        .collect()
}
