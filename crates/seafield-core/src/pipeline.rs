use crate::config::{ConfigError, PipelineConfig};
use crate::crop::{CropError, CroppedRegion, Window};
use crate::field::{compute_distance_field_scaled, DistanceField, FieldError};
use crate::grid::{Cell, Grid, GridError, Raster};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Config(ConfigError),
    Grid(GridError),
    Field(FieldError),
    Crop(CropError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config(e) => write!(f, "{}", e),
            PipelineError::Grid(e) => write!(f, "{}", e),
            PipelineError::Field(e) => write!(f, "{}", e),
            PipelineError::Crop(e) => write!(f, "{}", e),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Config(e) => Some(e),
            PipelineError::Grid(e) => Some(e),
            PipelineError::Field(e) => Some(e),
            PipelineError::Crop(e) => Some(e),
        }
    }
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        PipelineError::Config(err)
    }
}

impl From<GridError> for PipelineError {
    fn from(err: GridError) -> Self {
        PipelineError::Grid(err)
    }
}

impl From<FieldError> for PipelineError {
    fn from(err: FieldError) -> Self {
        PipelineError::Field(err)
    }
}

impl From<CropError> for PipelineError {
    fn from(err: CropError) -> Self {
        PipelineError::Crop(err)
    }
}

/// Region-wide field (`global`) and the crop around the target (`local`),
/// both narrowed to `f32` for tensor consumers.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub field: DistanceField,
    pub global: Raster<f32>,
    pub local: CroppedRegion<f32>,
    pub requested_crop: Window,
    pub target: Cell,
    pub sea_cells: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub global_shape: (usize, usize),
    pub local_shape: (usize, usize),
    pub requested_crop: (usize, usize),
    pub center_offset: Cell,
    pub clipped: bool,
    pub sea_cells: usize,
    pub reachable_cells: usize,
    /// `None` when the target is land or cut off from the source.
    pub target_distance: Option<f64>,
}

impl PipelineOutput {
    pub fn center_offset(&self) -> Cell {
        self.local.center_offset()
    }

    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary {
            global_shape: self.global.shape(),
            local_shape: self.local.shape(),
            requested_crop: (self.requested_crop.height(), self.requested_crop.width()),
            center_offset: self.local.center_offset(),
            clipped: self.local.is_clipped(self.requested_crop),
            sea_cells: self.sea_cells,
            reachable_cells: self.field.reachable_count(),
            target_distance: self.field.get(self.target).filter(|v| v.is_finite()),
        }
    }
}

/// Cut the configured sub-region from `mask`, run the distance field from the
/// local source, and crop it around the local target.
pub fn run_pipeline(
    mask: &Grid,
    config: &PipelineConfig,
) -> Result<PipelineOutput, PipelineError> {
    config.validate()?;
    debug!("global mask shape: {}x{}", mask.rows(), mask.cols());

    let region = mask.subgrid(config.region_origin, config.region_size)?;
    if !region.is_sea(config.source) {
        return Err(FieldError::InvalidStart {
            cell: config.source,
        }
        .into());
    }

    let field = compute_distance_field_scaled(&region, config.source, config.scale)?;
    let requested_crop = Window::try_from(config.crop_size)?;
    let local = field.crop(config.target, requested_crop).map(|&v| v as f32);
    info!(
        "local crop shape: {}x{} (requested {}x{})",
        local.rows(),
        local.cols(),
        requested_crop.height(),
        requested_crop.width()
    );

    Ok(PipelineOutput {
        global: field.to_f32(),
        local,
        requested_crop,
        target: config.target,
        sea_cells: region.sea_count(),
        field,
    })
}
