use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use seafield_core::{Cell, Grid, PipelineConfig, Raster, DEFAULT_SCALE};

type Rows = Vec<Vec<f64>>;

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn grid_from_rows(mask: Vec<Vec<u8>>) -> PyResult<Grid> {
    let rows = mask.len();
    let cols = mask.first().map_or(0, Vec::len);
    if mask.iter().any(|r| r.len() != cols) {
        return Err(value_error("mask rows must all have the same length"));
    }
    let flat: Vec<u8> = mask.into_iter().flatten().collect();
    Grid::from_mask(rows, cols, &flat).map_err(value_error)
}

fn raster_from_rows(array: Vec<Vec<f64>>) -> PyResult<Raster<f64>> {
    let rows = array.len();
    let cols = array.first().map_or(0, Vec::len);
    if array.iter().any(|r| r.len() != cols) {
        return Err(value_error("array rows must all have the same length"));
    }
    Raster::try_from_vec(rows, cols, array.into_iter().flatten().collect()).map_err(value_error)
}

/// Distance field from `source` over a 0 = sea / nonzero = land mask.
/// Unreachable and land cells are `inf`.
#[pyfunction]
#[pyo3(signature = (mask, source, scale = DEFAULT_SCALE))]
fn compute_distance_field(
    mask: Vec<Vec<u8>>,
    source: (usize, usize),
    scale: f64,
) -> PyResult<Rows> {
    let grid = grid_from_rows(mask)?;
    let field = seafield_core::compute_distance_field_scaled(&grid, Cell::from(source), scale)
        .map_err(value_error)?;
    Ok(field.values().to_rows())
}

/// Returns `(cropped_rows, (center_row, center_col))`.
#[pyfunction]
fn crop_centered(
    array: Vec<Vec<f64>>,
    center: (usize, usize),
    crop_size: (usize, usize),
) -> PyResult<(Rows, (usize, usize))> {
    let raster = raster_from_rows(array)?;
    let crop = seafield_core::try_crop_centered(&raster, Cell::from(center), crop_size)
        .map_err(value_error)?;
    let offset = crop.center_offset();
    let offset = (offset.row, offset.col);
    Ok((crop.to_rows(), offset))
}

/// Runs the full extraction. `config_json` overrides the defaults key by key.
/// Returns `(global_rows, local_rows, summary_json)`.
#[pyfunction]
#[pyo3(signature = (mask, config_json = None))]
fn run_pipeline(
    mask: Vec<Vec<u8>>,
    config_json: Option<&str>,
) -> PyResult<(Vec<Vec<f32>>, Vec<Vec<f32>>, String)> {
    let grid = grid_from_rows(mask)?;
    let config = match config_json {
        Some(json) => PipelineConfig::from_json(json).map_err(value_error)?,
        None => PipelineConfig::default(),
    };
    let output = seafield_core::run_pipeline(&grid, &config).map_err(value_error)?;
    let summary = serde_json::to_string(&output.summary()).map_err(value_error)?;
    Ok((output.global.to_rows(), output.local.to_rows(), summary))
}

#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(compute_distance_field, m)?)?;
    m.add_function(wrap_pyfunction!(crop_centered, m)?)?;
    m.add_function(wrap_pyfunction!(run_pipeline, m)?)?;
    m.add("DEFAULT_SCALE", DEFAULT_SCALE)?;
    Ok(())
}
