use crate::grid::{Cell, Raster};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Requested crop size. Both extents are at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Window {
    height: usize,
    width: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropError {
    DegenerateWindow { height: usize, width: usize },
}

impl fmt::Display for CropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropError::DegenerateWindow { height, width } => write!(
                f,
                "crop window must be at least 1x1 (got {height}x{width})"
            ),
        }
    }
}

impl Error for CropError {}

impl Window {
    pub fn try_new(height: usize, width: usize) -> Result<Self, CropError> {
        if height == 0 || width == 0 {
            return Err(CropError::DegenerateWindow { height, width });
        }
        Ok(Self { height, width })
    }

    pub fn new(height: usize, width: usize) -> Self {
        Self::try_new(height, width).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Floor-division half extents `(h / 2, w / 2)`.
    pub fn half_extents(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }
}

impl TryFrom<(usize, usize)> for Window {
    type Error = CropError;

    fn try_from((height, width): (usize, usize)) -> Result<Self, Self::Error> {
        Self::try_new(height, width)
    }
}

/// Half-open source-array bounds a crop was taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropBounds {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

impl CropBounds {
    /// Clip the window around `center` against a `rows x cols` array.
    ///
    /// Even extents put the extra row/col after the center. A center past the
    /// far edge yields an empty extent on that axis.
    pub fn clipped(center: Cell, window: Window, rows: usize, cols: usize) -> Self {
        let (dh, dw) = window.half_extents();
        let row_min = center.row.saturating_sub(dh);
        let row_max = center
            .row
            .saturating_add(window.height - dh)
            .min(rows)
            .max(row_min);
        let col_min = center.col.saturating_sub(dw);
        let col_max = center
            .col
            .saturating_add(window.width - dw)
            .min(cols)
            .max(col_min);
        Self {
            row_min,
            row_max,
            col_min,
            col_max,
        }
    }

    pub fn height(&self) -> usize {
        self.row_max - self.row_min
    }

    pub fn width(&self) -> usize {
        self.col_max - self.col_min
    }
}

/// An owned sub-array plus where the crop center sits inside it.
///
/// `data.len() == rows * cols` always holds; either extent may be zero.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CroppedRegion<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
    center_offset: Cell,
    bounds: CropBounds,
}

impl<T> CroppedRegion<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Center position relative to the clipped crop's top-left corner.
    pub fn center_offset(&self) -> Cell {
        self.center_offset
    }

    pub fn bounds(&self) -> CropBounds {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, cell: Cell) -> Option<&T> {
        (cell.row < self.rows && cell.col < self.cols)
            .then(|| &self.data[cell.row * self.cols + cell.col])
    }

    /// True when clipping made the crop smaller than `window`.
    pub fn is_clipped(&self, window: Window) -> bool {
        self.rows < window.height() || self.cols < window.width()
    }

    pub fn map<U, F: FnMut(&T) -> U>(&self, f: F) -> CroppedRegion<U> {
        CroppedRegion {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
            center_offset: self.center_offset,
            bounds: self.bounds,
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<T>>
    where
        T: Clone,
    {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(|r| r.to_vec()).collect()
    }
}

/// Copy the `window`-sized block centered on `center`, clipped to `array`.
///
/// Never pads and never fails: oversized windows and edge centers just
/// produce a smaller crop. `center_offset` is measured from the clipped
/// bounds, so it stays correct for markers placed on the output.
pub fn crop_centered<T: Clone>(
    array: &Raster<T>,
    center: Cell,
    window: Window,
) -> CroppedRegion<T> {
    let bounds = CropBounds::clipped(center, window, array.rows(), array.cols());
    let mut data = Vec::with_capacity(bounds.height() * bounds.width());
    if bounds.width() > 0 {
        for r in bounds.row_min..bounds.row_max {
            data.extend_from_slice(&array.row(r)[bounds.col_min..bounds.col_max]);
        }
    }
    let center_offset = Cell::new(center.row - bounds.row_min, center.col - bounds.col_min);

    let cropped = CroppedRegion {
        rows: bounds.height(),
        cols: bounds.width(),
        data,
        center_offset,
        bounds,
    };
    if cropped.is_clipped(window) {
        debug!(
            "crop at {center} clipped to {}x{} (requested {}x{})",
            cropped.rows,
            cropped.cols,
            window.height(),
            window.width()
        );
    } else {
        trace!("crop at {center} -> {bounds:?}");
    }
    cropped
}

pub fn try_crop_centered<T: Clone>(
    array: &Raster<T>,
    center: Cell,
    size: (usize, usize),
) -> Result<CroppedRegion<T>, CropError> {
    let window = Window::try_from(size)?;
    Ok(crop_centered(array, center, window))
}
