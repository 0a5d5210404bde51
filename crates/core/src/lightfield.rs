//! Light-field image set to angular-spectrum complex field conversion.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use thiserror::Error;

use crate::backend::{TransformBackend, TransformBuffer};
use crate::context::{X, Y};
use crate::field::{ComplexField, Dims};

/// Light-field validation failures. Declared and actual view geometry must
/// agree before conversion starts; a mismatch is a load-time error.
#[derive(Debug, Error)]
pub enum LightFieldError {
    #[error("expected {expected} sub-aperture views, got {actual}")]
    ViewCountMismatch { expected: usize, actual: usize },
    #[error("view {view} has {actual} samples, expected {expected}")]
    ViewSizeMismatch {
        view: usize,
        expected: usize,
        actual: usize,
    },
}

/// A grid of sub-aperture views, each a grayscale buffer of identical
/// resolution. Read-only during conversion.
#[derive(Debug, Clone)]
pub struct LightField {
    num_image: [usize; 2],
    resolution: [usize; 2],
    views: Vec<Vec<u8>>,
}

impl LightField {
    /// Views are ordered x-major: `view = idx_nx + num_x * idx_ny`.
    pub fn new(
        num_image: [usize; 2],
        resolution: [usize; 2],
        views: Vec<Vec<u8>>,
    ) -> Result<Self, LightFieldError> {
        let expected = num_image[X] * num_image[Y];
        if views.len() != expected {
            return Err(LightFieldError::ViewCountMismatch {
                expected,
                actual: views.len(),
            });
        }
        let view_len = resolution[X] * resolution[Y];
        for (view, data) in views.iter().enumerate() {
            if data.len() != view_len {
                return Err(LightFieldError::ViewSizeMismatch {
                    view,
                    expected: view_len,
                    actual: data.len(),
                });
            }
        }
        Ok(Self {
            num_image,
            resolution,
            views,
        })
    }

    pub fn num_image(&self) -> [usize; 2] {
        self.num_image
    }

    pub fn resolution(&self) -> [usize; 2] {
        self.resolution
    }

    /// Full SLM pixel dimensions implied by this set:
    /// `num_image * resolution` per axis.
    pub fn field_dims(&self) -> Dims {
        Dims::new(
            self.num_image[X] * self.resolution[X],
            self.num_image[Y] * self.resolution[Y],
        )
    }

    fn sample(&self, idx_nx: usize, idx_ny: usize, idx_rx: usize, idx_ry: usize) -> u8 {
        let view = &self.views[idx_nx + self.num_image[X] * idx_ny];
        view[idx_rx + self.resolution[X] * idx_ry]
    }
}

/// Explicit, seedable pseudo-random phase source for the diffuser step.
///
/// Seeding rule, pinned for reproducibility: the phase for per-view pixel
/// (idx_rx, idx_ry) draws one uniform sample from
/// `StdRng::seed_from_u64(seed ^ (idx_rx * idx_ry))`. The per-product
/// reseeding mirrors the reference generator, so positions with equal index
/// products share a phase.
#[derive(Debug, Clone, Copy)]
pub struct SeededDiffuser {
    seed: u64,
}

impl SeededDiffuser {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Diffuser angle in [0, 2*pi).
    pub fn phase(&self, idx_rx: usize, idx_ry: usize) -> f64 {
        let mut rng = StdRng::seed_from_u64(self.seed ^ (idx_rx * idx_ry) as u64);
        rng.gen::<f64>() * 2.0 * PI
    }
}

/// Convert a light-field image set into a single complex field of size
/// `(num_x * res_x, num_y * res_y)`.
///
/// For every per-view pixel position: gather the nx-by-ny complex image of
/// corresponding samples across all views, forward-transform and
/// quadrant-shift it, rotate every sample by the diffuser phase, and scatter
/// into the 4D-flattened output at
/// `nx*rx*ny*idx_ry + nx*rx*idx_ny + nx*idx_rx + idx_nx`. Downstream
/// propagation assumes exactly this interleave.
///
/// The two nx-by-ny scratch buffers are allocated once and reused across all
/// per-view pixel iterations. Single-threaded per invocation; parallelizing
/// would require per-thread scratch to preserve the reuse invariant.
pub fn convert_to_field<B: TransformBackend>(
    light_field: &LightField,
    backend: &B,
    diffuser: &SeededDiffuser,
) -> ComplexField {
    let [nx, ny] = light_field.num_image();
    let [rx, ry] = light_field.resolution();
    let mut out = ComplexField::zeros(light_field.field_dims());

    let sub_dims = Dims::new(nx, ny);
    let mut complex_lf = backend.alloc_field(sub_dims);
    let mut fft_lf = backend.alloc_field(sub_dims);

    for idx_rx in 0..rx {
        for idx_ry in 0..ry {
            let gather = complex_lf.as_mut_slice();
            for idx_ny in 0..ny {
                for idx_nx in 0..nx {
                    let value = light_field.sample(idx_nx, idx_ny, idx_rx, idx_ry);
                    gather[idx_nx + nx * idx_ny] = Complex64::new(value as f64, 0.0);
                }
            }

            fft_lf.as_mut_slice().copy_from_slice(complex_lf.as_slice());
            backend.forward_fft_2d(&mut fft_lf);
            backend.shift_quadrants(&mut fft_lf);

            let rotation = Complex64::from_polar(1.0, diffuser.phase(idx_rx, idx_ry));
            let spectrum = fft_lf.as_slice();
            let scatter = out.as_mut_slice();
            for idx_ny in 0..ny {
                for idx_nx in 0..nx {
                    let sample = spectrum[idx_nx + nx * idx_ny] * rotation;
                    scatter[nx * rx * ny * idx_ry + nx * rx * idx_ny + nx * idx_rx + idx_nx] =
                        sample;
                }
            }
        }
    }

    out
}
