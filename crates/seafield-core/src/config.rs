use crate::field::DEFAULT_SCALE;
use crate::grid::Cell;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Parameters for one local-field extraction.
///
/// `source` and `target` are local to the sub-region cut at `region_origin`.
/// The target may fall outside the region; the crop around it is clipped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub region_origin: Cell,
    pub region_size: (usize, usize),
    pub source: Cell,
    pub target: Cell,
    pub crop_size: (usize, usize),
    pub scale: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            region_origin: Cell::new(150, 230),
            region_size: (120, 210),
            source: Cell::new(80, 40),
            target: Cell::new(60, 100),
            crop_size: (12, 21),
            scale: DEFAULT_SCALE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyRegion { size: (usize, usize) },
    DegenerateCrop { size: (usize, usize) },
    InvalidScale { scale: f64 },
    SourceOutsideRegion { source: Cell, size: (usize, usize) },
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyRegion { size } => {
                write!(f, "region_size must be non-zero (got {}x{})", size.0, size.1)
            }
            ConfigError::DegenerateCrop { size } => {
                write!(f, "crop_size must be non-zero (got {}x{})", size.0, size.1)
            }
            ConfigError::InvalidScale { scale } => {
                write!(f, "scale must be finite and positive (got {scale})")
            }
            ConfigError::SourceOutsideRegion { source, size } => write!(
                f,
                "source {source} lies outside the {}x{} region",
                size.0, size.1
            ),
            ConfigError::Parse(msg) => write!(f, "invalid pipeline config: {msg}"),
        }
    }
}

impl Error for ConfigError {}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (h, w) = self.region_size;
        if h == 0 || w == 0 {
            return Err(ConfigError::EmptyRegion {
                size: self.region_size,
            });
        }
        if self.crop_size.0 == 0 || self.crop_size.1 == 0 {
            return Err(ConfigError::DegenerateCrop {
                size: self.crop_size,
            });
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale { scale: self.scale });
        }
        if self.source.row >= h || self.source.col >= w {
            return Err(ConfigError::SourceOutsideRegion {
                source: self.source,
                size: self.region_size,
            });
        }
        Ok(())
    }

    /// Parse and validate. Missing keys fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
