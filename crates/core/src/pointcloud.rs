//! Point-cloud hologram builder.
//!
//! Iterates scene points, remaps them through the optional viewing-window
//! transform and the configured scale/offset, and accumulates the selected
//! diffraction kernel into one complex field per wavelength channel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::context::{OpticalContext, X, Y, Z};
use crate::field::ComplexField;
use crate::kernel;

/// Which point-to-plane kernel to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiffractionMethod {
    /// Exact scalar Rayleigh-Sommerfeld formula.
    #[default]
    #[serde(rename = "rs")]
    RayleighSommerfeld,
    /// Paraxial Fresnel approximation.
    Fresnel,
}

/// A loaded point-cloud scene: flat xyz triplets plus per-point color
/// amplitudes. Immutable after load; the builder only reads it.
#[derive(Debug, Clone)]
pub struct PointCloud {
    points: Vec<f64>,
    colors: Vec<f64>,
    color_channels: usize,
}

impl PointCloud {
    pub fn new(points: Vec<f64>, colors: Vec<f64>, color_channels: usize) -> Self {
        assert!(color_channels > 0, "point cloud needs at least one color channel");
        assert_eq!(points.len() % 3, 0, "points must be flat xyz triplets");
        assert_eq!(
            colors.len(),
            points.len() / 3 * color_channels,
            "colors length must be n_points * color_channels"
        );
        Self {
            points,
            colors,
            color_channels,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn color_channels(&self) -> usize {
        self.color_channels
    }

    pub fn position(&self, point: usize) -> [f64; 3] {
        let idx = 3 * point;
        [self.points[idx + X], self.points[idx + Y], self.points[idx + Z]]
    }

    /// Per-channel amplitude. Monochrome scenes reuse their single color
    /// column for every wavelength channel.
    pub fn amplitude(&self, point: usize, channel: usize) -> f64 {
        let c = if channel < self.color_channels { channel } else { 0 };
        self.colors[self.color_channels * point + c]
    }
}

/// Scene-specific builder parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointCloudConfig {
    /// Anisotropic coordinate scale applied after the viewing-window remap.
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
    /// Additive depth offset applied after scaling.
    #[serde(default)]
    pub offset_depth: f64,
    /// Tilt angle in degrees. Parsed for configuration compatibility; the
    /// not-encoded kernels do not consume it.
    #[serde(default)]
    pub tilt_angle: [f64; 2],
    /// Field-lens distance of the viewing optics.
    #[serde(default)]
    pub field_lens: f64,
    #[serde(default)]
    pub diffraction: DiffractionMethod,
    /// Remap coordinates through the viewing-window transform before scaling.
    #[serde(default)]
    pub viewing_window: bool,
}

fn default_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

impl Default for PointCloudConfig {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            offset_depth: 0.0,
            tilt_angle: [0.0, 0.0],
            field_lens: 0.0,
            diffraction: DiffractionMethod::default(),
            viewing_window: false,
        }
    }
}

/// Projective viewing-window remap `dst = -L * src / (src - L)` with the
/// field-lens distance `L`, applied independently per coordinate.
///
/// Zero is a fixed point. `src == field_lens` divides by zero and yields a
/// non-finite value; this singularity is a documented scene precondition and
/// is not guarded.
pub fn transform_viewing_window(field_lens: f64, src: f64) -> f64 {
    -field_lens * src / (src - field_lens)
}

fn transform_point(config: &PointCloudConfig, pos: [f64; 3]) -> [f64; 3] {
    let [mut pcx, mut pcy, mut pcz] = pos;
    if config.viewing_window {
        pcx = transform_viewing_window(config.field_lens, pcx);
        pcy = transform_viewing_window(config.field_lens, pcy);
        pcz = transform_viewing_window(config.field_lens, pcz);
    }
    pcx *= config.scale[X];
    pcy *= config.scale[Y];
    pcz *= config.scale[Z];
    pcz += config.offset_depth;
    [pcx, pcy, pcz]
}

/// Build one complex field per wavelength channel from a point-cloud scene.
///
/// Points are distributed over rayon's worker pool; each worker accumulates
/// into its own zeroed field and the partial fields are summed at the join.
/// Point-to-pixel contributions are independent, so the summation is
/// order-free up to floating-point rounding, and the reduce is the barrier
/// that must complete before propagation or encoding reads the buffers.
pub fn generate(
    cloud: &PointCloud,
    config: &PointCloudConfig,
    ctx: &OpticalContext,
) -> Vec<ComplexField> {
    let dims = ctx.dims();
    (0..ctx.channels())
        .map(|channel| {
            let wavelength = ctx.wavelength(channel);
            let k = ctx.wavenumber(channel);
            (0..cloud.len())
                .into_par_iter()
                .fold(
                    || ComplexField::zeros(dims),
                    |mut acc, point| {
                        let pc = transform_point(config, cloud.position(point));
                        let amplitude = cloud.amplitude(point, channel);
                        match config.diffraction {
                            DiffractionMethod::RayleighSommerfeld => {
                                kernel::diffract_rs(&mut acc, ctx, wavelength, k, pc, amplitude)
                            }
                            DiffractionMethod::Fresnel => {
                                kernel::diffract_fresnel(&mut acc, ctx, wavelength, k, pc, amplitude)
                            }
                        }
                        acc
                    },
                )
                .reduce(
                    || ComplexField::zeros(dims),
                    |mut a, b| {
                        a.add_assign(&b);
                        a
                    },
                )
        })
        .collect()
}
