use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Integer grid coordinate, row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Sea,
    Land,
}

impl CellState {
    pub fn is_sea(self) -> bool {
        self == CellState::Sea
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    EmptyGrid { rows: usize, cols: usize },
    ShapeMismatch { expected: usize, actual: usize },
    RegionOutOfBounds {
        origin: Cell,
        size: (usize, usize),
        shape: (usize, usize),
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::EmptyGrid { rows, cols } => {
                write!(f, "grid must have at least one row and column (got {rows}x{cols})")
            }
            GridError::ShapeMismatch { expected, actual } => write!(
                f,
                "data length ({actual}) must match rows * cols ({expected})"
            ),
            GridError::RegionOutOfBounds {
                origin,
                size,
                shape,
            } => write!(
                f,
                "region at {origin} of size {}x{} exceeds grid dimensions {}x{}",
                size.0, size.1, shape.0, shape.1
            ),
        }
    }
}

impl Error for GridError {}

/// Dense row-major 2-D array.
///
/// Shared storage for occupancy grids and distance fields. A `Raster` always
/// has at least one row and one column.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Raster<T> {
    pub fn try_from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid { rows, cols });
        }
        let expected = rows
            .checked_mul(cols)
            .ok_or(GridError::ShapeMismatch {
                expected: usize::MAX,
                actual: data.len(),
            })?;
        if data.len() != expected {
            return Err(GridError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Self {
        Self::try_from_vec(rows, cols, data).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; kept for parity with slice-like APIs.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.contains(cell).then(|| cell.row * self.cols + cell.col)
    }

    pub fn cell_at(&self, index: usize) -> Cell {
        Cell::new(index / self.cols, index % self.cols)
    }

    pub fn get(&self, cell: Cell) -> Option<&T> {
        self.index_of(cell).map(|i| &self.data[i])
    }

    /// Panics when `row >= rows`; callers check bounds first.
    pub(crate) fn row(&self, row: usize) -> &[T] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> Raster<U> {
        Raster {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        self.data.chunks(self.cols).map(|r| r.to_vec()).collect()
    }
}

/// Land/sea occupancy grid. `Sea` cells are traversable.
pub type Grid = Raster<CellState>;

impl Raster<CellState> {
    /// Build from a persisted mask where `0` is sea and anything else is land.
    pub fn from_mask(rows: usize, cols: usize, mask: &[u8]) -> Result<Self, GridError> {
        let data = mask
            .iter()
            .map(|&v| if v == 0 { CellState::Sea } else { CellState::Land })
            .collect();
        Self::try_from_vec(rows, cols, data)
    }

    /// Build from a gridded ocean product where land is encoded as NaN.
    pub fn from_nan_mask(rows: usize, cols: usize, values: &[f32]) -> Result<Self, GridError> {
        let data = values
            .iter()
            .map(|v| if v.is_nan() { CellState::Land } else { CellState::Sea })
            .collect();
        Self::try_from_vec(rows, cols, data)
    }

    pub fn is_sea(&self, cell: Cell) -> bool {
        self.get(cell).is_some_and(|s| s.is_sea())
    }

    pub fn sea_count(&self) -> usize {
        self.data.iter().filter(|s| s.is_sea()).count()
    }

    /// Cut an `(h, w)` block whose top-left corner is `origin`.
    ///
    /// Never clips: the whole block must lie inside the grid.
    pub fn subgrid(&self, origin: Cell, size: (usize, usize)) -> Result<Grid, GridError> {
        let (h, w) = size;
        let out_of_bounds = || GridError::RegionOutOfBounds {
            origin,
            size,
            shape: self.shape(),
        };
        let row_end = origin.row.checked_add(h).ok_or_else(out_of_bounds)?;
        let col_end = origin.col.checked_add(w).ok_or_else(out_of_bounds)?;
        if row_end > self.rows || col_end > self.cols {
            return Err(out_of_bounds());
        }
        let mut data = Vec::with_capacity(h * w);
        for r in origin.row..row_end {
            data.extend_from_slice(&self.row(r)[origin.col..col_end]);
        }
        Raster::try_from_vec(h, w, data)
    }
}
