//! Normalized sea-route distance fields over land/sea occupancy grids, and
//! clipped crops of those fields around arbitrary target cells.

pub mod config;
pub mod crop;
pub mod field;
pub mod grid;
pub mod pipeline;

pub use config::{ConfigError, PipelineConfig};
pub use crop::{crop_centered, try_crop_centered, CropBounds, CropError, CroppedRegion, Window};
pub use field::{
    compute_distance_field, compute_distance_field_scaled, compute_distance_fields,
    DistanceField, FieldError, DEFAULT_SCALE,
};
pub use grid::{Cell, CellState, Grid, GridError, Raster};
pub use pipeline::{run_pipeline, PipelineError, PipelineOutput, PipelineSummary};
