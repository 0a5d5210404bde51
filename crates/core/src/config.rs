//! Run configuration types and validation.
//!
//! A run is described by a TOML file; the CLI parses it into [`RunConfig`]
//! and calls [`RunConfig::validate`] before any buffer is allocated.
//!
//! # File Format
//!
//! ```toml
//! [context]
//! pixel_pitch = [8e-6, 8e-6]
//! pixel_number = [1024, 1024]
//! wavelengths = [638e-9, 520e-9, 450e-9]
//!
//! [source]
//! type = "pointcloud"
//!
//! [pointcloud]
//! path = "scene.xyz"
//! scale = [0.01, 0.01, 0.01]
//! offset_depth = 0.5
//! diffraction = "rs"
//!
//! [encoding]
//! band_limit = [0.8, 0.5]
//! spectrum_shift = [0.0, 0.5]
//! ```
//!
//! Light-field runs replace `[pointcloud]` with:
//!
//! ```toml
//! [source]
//! type = "lightfield"
//!
//! [lightfield]
//! directory = "views/"
//! num_image = [10, 10]
//! resolution_image = [160, 90]
//! distance = 0.5
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::context::{OpticalContext, X, Y};
use crate::encoder::EncodingConfig;
use crate::pointcloud::{DiffractionMethod, PointCloudConfig};

// ============================================================================
// Source Selection
// ============================================================================

/// Which scene representation drives the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Sparse 3D points diffracted point-by-point.
    PointCloud,
    /// Dense sub-aperture image stack converted through the angular spectrum.
    LightField,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::PointCloud => write!(f, "point cloud"),
            SourceType::LightField => write!(f, "light field"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    #[serde(rename = "type")]
    pub source_type: SourceType,
}

// ============================================================================
// Sections
// ============================================================================

/// SLM and illumination parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSection {
    pub pixel_pitch: [f64; 2],
    /// Wavelength per color channel, at least one.
    pub wavelengths: Vec<f64>,
    /// Required for point-cloud runs. For light-field runs it is derived
    /// from `num_image * resolution_image`; declaring a conflicting value
    /// is a configuration error.
    #[serde(default)]
    pub pixel_number: Option<[usize; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCloudSection {
    /// Scene file: one `x y z c..` record per line.
    pub path: PathBuf,
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
    #[serde(default)]
    pub offset_depth: f64,
    #[serde(default)]
    pub tilt_angle: [f64; 2],
    #[serde(default)]
    pub field_lens: f64,
    #[serde(default)]
    pub diffraction: DiffractionMethod,
    #[serde(default)]
    pub viewing_window: bool,
    /// Optional propagation distance from the assembly plane to the
    /// hologram plane; omitted means the field is encoded where it was built.
    #[serde(default)]
    pub distance: Option<f64>,
}

fn default_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

impl PointCloudSection {
    pub fn builder_config(&self) -> PointCloudConfig {
        PointCloudConfig {
            scale: self.scale,
            offset_depth: self.offset_depth,
            tilt_angle: self.tilt_angle,
            field_lens: self.field_lens,
            diffraction: self.diffraction,
            viewing_window: self.viewing_window,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightFieldSection {
    /// Directory of sub-aperture views, consumed in sorted filename order.
    pub directory: PathBuf,
    pub num_image: [usize; 2],
    pub resolution_image: [usize; 2],
    /// Propagation distance from the converter plane to the hologram plane.
    pub distance: f64,
    /// Seed of the diffuser phase source.
    #[serde(default)]
    pub phase_seed: u64,
}

impl LightFieldSection {
    /// `pixel_number = num_image * resolution_image`, the cross-entity
    /// invariant of light-field runs.
    pub fn derived_pixel_number(&self) -> [usize; 2] {
        [
            self.num_image[X] * self.resolution_image[X],
            self.num_image[Y] * self.resolution_image[Y],
        ]
    }
}

// ============================================================================
// Run Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub context: ContextSection,
    pub source: SourceSection,
    #[serde(default)]
    pub pointcloud: Option<PointCloudSection>,
    #[serde(default)]
    pub lightfield: Option<LightFieldSection>,
    #[serde(default)]
    pub encoding: EncodingConfig,
}

impl RunConfig {
    pub fn source_type(&self) -> SourceType {
        self.source.source_type
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ctx = &self.context;
        if ctx.wavelengths.is_empty() {
            return Err(ConfigError::InvalidContext(
                "at least one wavelength is required".into(),
            ));
        }
        if ctx.wavelengths.iter().any(|&w| !(w > 0.0)) {
            return Err(ConfigError::InvalidContext(
                "wavelengths must be positive".into(),
            ));
        }
        if !(ctx.pixel_pitch[X] > 0.0) || !(ctx.pixel_pitch[Y] > 0.0) {
            return Err(ConfigError::InvalidContext(
                "pixel pitch must be positive on both axes".into(),
            ));
        }
        if let Some(pn) = ctx.pixel_number {
            if pn[X] == 0 || pn[Y] == 0 {
                return Err(ConfigError::InvalidContext(
                    "pixel number must be non-zero on both axes".into(),
                ));
            }
        }

        match self.source.source_type {
            SourceType::PointCloud => self.validate_pointcloud(),
            SourceType::LightField => self.validate_lightfield(),
        }?;

        let enc = &self.encoding;
        if !(enc.band_limit[X] > 0.0) || !(enc.band_limit[Y] > 0.0) {
            return Err(ConfigError::InvalidEncoding(
                "band_limit must be positive on both axes".into(),
            ));
        }
        Ok(())
    }

    fn validate_pointcloud(&self) -> Result<(), ConfigError> {
        let section = self
            .pointcloud
            .as_ref()
            .ok_or(ConfigError::MissingSection("pointcloud"))?;
        if self.context.pixel_number.is_none() {
            return Err(ConfigError::InvalidContext(
                "pixel_number is required for point-cloud runs".into(),
            ));
        }
        if section.viewing_window && section.field_lens == 0.0 {
            return Err(ConfigError::InvalidSource(
                "viewing_window requires a non-zero field_lens".into(),
            ));
        }
        Ok(())
    }

    fn validate_lightfield(&self) -> Result<(), ConfigError> {
        let section = self
            .lightfield
            .as_ref()
            .ok_or(ConfigError::MissingSection("lightfield"))?;
        if section.num_image[X] == 0
            || section.num_image[Y] == 0
            || section.resolution_image[X] == 0
            || section.resolution_image[Y] == 0
        {
            return Err(ConfigError::InvalidSource(
                "num_image and resolution_image must be non-zero".into(),
            ));
        }
        if !section.distance.is_finite() {
            return Err(ConfigError::InvalidSource(
                "propagation distance must be finite".into(),
            ));
        }
        let derived = section.derived_pixel_number();
        if let Some(declared) = self.context.pixel_number {
            if declared != derived {
                return Err(ConfigError::DimensionConflict { declared, derived });
            }
        }
        Ok(())
    }

    /// Build the optical context for this run; for light-field runs the
    /// pixel count is derived from the view geometry.
    pub fn build_context(&self) -> Result<OpticalContext, ConfigError> {
        let pixel_number = match self.source.source_type {
            SourceType::PointCloud => self.context.pixel_number.ok_or_else(|| {
                ConfigError::InvalidContext("pixel_number is required for point-cloud runs".into())
            })?,
            SourceType::LightField => self
                .lightfield
                .as_ref()
                .ok_or(ConfigError::MissingSection("lightfield"))?
                .derived_pixel_number(),
        };
        Ok(OpticalContext::new(
            pixel_number,
            self.context.pixel_pitch,
            self.context.wavelengths.clone(),
        ))
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing [{0}] section for the selected source type")]
    MissingSection(&'static str),

    #[error("invalid [context]: {0}")]
    InvalidContext(String),

    #[error("invalid source configuration: {0}")]
    InvalidSource(String),

    #[error("invalid [encoding]: {0}")]
    InvalidEncoding(String),

    #[error(
        "declared pixel_number {declared:?} conflicts with num_image * resolution_image = {derived:?}"
    )]
    DimensionConflict {
        declared: [usize; 2],
        derived: [usize; 2],
    },
}
