pub mod batch;
#[cfg(test)]
mod tests;

pub use batch::compute_distance_fields;

use crate::crop::{crop_centered, CroppedRegion, Window};
use crate::grid::{Cell, Grid, Raster};
use log::debug;
use std::{error::Error, fmt};

/// Divisor turning hop counts into the normalized range consumers train on.
pub const DEFAULT_SCALE: f64 = 300.0;

/// Up, down, left, right.
const NEIGHBORS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const UNREACHED: usize = usize::MAX;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    InvalidStart { cell: Cell },
    InvalidScale { scale: f64 },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::InvalidStart { cell } => {
                write!(f, "start cell {cell} is land or outside the grid")
            }
            FieldError::InvalidScale { scale } => {
                write!(
                    f,
                    "normalization scale must be positive and keep distances finite (got {scale})"
                )
            }
        }
    }
}

impl Error for FieldError {}

/// Normalized shortest-path distances from one sea cell.
///
/// Finite entries are `hops / scale`; land and unreachable sea carry
/// `f64::INFINITY`.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceField {
    values: Raster<f64>,
    source: Cell,
    scale: f64,
}

impl DistanceField {
    pub fn values(&self) -> &Raster<f64> {
        &self.values
    }

    pub fn into_values(self) -> Raster<f64> {
        self.values
    }

    pub fn source(&self) -> Cell {
        self.source
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    pub fn get(&self, cell: Cell) -> Option<f64> {
        self.values.get(cell).copied()
    }

    pub fn is_reachable(&self, cell: Cell) -> bool {
        self.get(cell).is_some_and(f64::is_finite)
    }

    /// Integer hop count back from the normalized value.
    pub fn hops(&self, cell: Cell) -> Option<usize> {
        self.get(cell)
            .filter(|v| v.is_finite())
            .map(|v| (v * self.scale).round() as usize)
    }

    pub fn reachable_count(&self) -> usize {
        self.values.as_slice().iter().filter(|v| v.is_finite()).count()
    }

    pub fn max_finite(&self) -> Option<f64> {
        self.values
            .as_slice()
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }

    pub fn crop(&self, center: Cell, window: Window) -> CroppedRegion<f64> {
        crop_centered(&self.values, center, window)
    }

    /// Narrow to `f32` for tensor hand-off. Infinity survives the cast.
    pub fn to_f32(&self) -> Raster<f32> {
        self.values.map(|&v| v as f32)
    }
}

pub fn compute_distance_field(grid: &Grid, source: Cell) -> Result<DistanceField, FieldError> {
    compute_distance_field_scaled(grid, source, DEFAULT_SCALE)
}

/// Breadth-first hop distances over 4-connected sea cells, divided by `scale`.
pub fn compute_distance_field_scaled(
    grid: &Grid,
    source: Cell,
    scale: f64,
) -> Result<DistanceField, FieldError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(FieldError::InvalidScale { scale });
    }
    let start = grid
        .index_of(source)
        .filter(|&i| grid.as_slice()[i].is_sea())
        .ok_or(FieldError::InvalidStart { cell: source })?;

    let hops = hop_counts(grid, start);
    let mut reached = 0usize;
    let mut max_hops = 0usize;
    let values: Vec<f64> = hops
        .iter()
        .map(|&h| {
            if h == UNREACHED {
                f64::INFINITY
            } else {
                reached += 1;
                max_hops = max_hops.max(h);
                h as f64 / scale
            }
        })
        .collect();
    // Scales small enough to overflow would make reachable cells look unreachable.
    if !(max_hops as f64 / scale).is_finite() {
        return Err(FieldError::InvalidScale { scale });
    }
    debug!(
        "distance field from {source}: reached {reached}/{} sea cells, max {max_hops} hops",
        grid.sea_count()
    );

    let (rows, cols) = grid.shape();
    Ok(DistanceField {
        values: Raster::from_vec(rows, cols, values),
        source,
        scale,
    })
}

/// Level-ordered BFS. The queue is a flat buffer sized to the grid; every
/// cell is pushed at most once, so it never reallocates.
fn hop_counts(grid: &Grid, start: usize) -> Vec<usize> {
    let (rows, cols) = grid.shape();
    let cells = grid.as_slice();
    let mut hops = vec![UNREACHED; cells.len()];
    let mut queue = Vec::with_capacity(cells.len());
    hops[start] = 0;
    queue.push(start);

    let mut head = 0;
    while let Some(&idx) = queue.get(head) {
        head += 1;
        let (r, c) = (idx / cols, idx % cols);
        let next = hops[idx] + 1;
        for (dr, dc) in NEIGHBORS {
            let Some(nr) = r.checked_add_signed(dr).filter(|&nr| nr < rows) else {
                continue;
            };
            let Some(nc) = c.checked_add_signed(dc).filter(|&nc| nc < cols) else {
                continue;
            };
            let n = nr * cols + nc;
            if cells[n].is_sea() && hops[n] == UNREACHED {
                hops[n] = next;
                queue.push(n);
            }
        }
    }
    hops
}
