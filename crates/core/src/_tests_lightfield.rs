#![cfg(test)]

use std::f64::consts::PI;

use num_complex::Complex64;

use super::backend::TransformBackend;
use super::field::{ComplexField, Dims};
use super::lightfield::{convert_to_field, LightField, LightFieldError, SeededDiffuser};

/// Transform stand-in: multiplies each sample by a unit phase (so forward
/// then inverse is the identity and magnitudes are preserved) and performs
/// a real quadrant roll.
#[derive(Clone)]
pub struct DummyBackend;

impl DummyBackend {
    fn phase(dims: Dims, ix: usize, iy: usize) -> Complex64 {
        let argument = -2.0 * PI * (ix as f64 / dims.nx as f64 + iy as f64 / dims.ny as f64);
        Complex64::from_polar(1.0, argument)
    }

    fn apply_phase(buffer: &mut ComplexField, conjugate: bool) {
        let dims = buffer.dims();
        for iy in 0..dims.ny {
            for ix in 0..dims.nx {
                let mut factor = Self::phase(dims, ix, iy);
                if conjugate {
                    factor = factor.conj();
                }
                *buffer.get_mut(ix, iy) *= factor;
            }
        }
    }
}

impl TransformBackend for DummyBackend {
    type Buffer = ComplexField;

    fn alloc_field(&self, dims: Dims) -> Self::Buffer {
        ComplexField::zeros(dims)
    }

    fn forward_fft_2d(&self, buffer: &mut Self::Buffer) {
        Self::apply_phase(buffer, false);
    }

    fn inverse_fft_2d(&self, buffer: &mut Self::Buffer) {
        Self::apply_phase(buffer, true);
    }

    fn shift_quadrants(&self, buffer: &mut Self::Buffer) {
        let dims = buffer.dims();
        let data = buffer.as_mut_slice();
        let mut shifted = vec![Complex64::default(); data.len()];
        for iy in 0..dims.ny {
            let sy = (iy + dims.ny / 2) % dims.ny;
            for ix in 0..dims.nx {
                let sx = (ix + dims.nx / 2) % dims.nx;
                shifted[sy * dims.nx + sx] = data[iy * dims.nx + ix];
            }
        }
        data.copy_from_slice(&shifted);
    }
}

fn all_ones_light_field() -> LightField {
    let views = vec![vec![1u8; 16]; 4];
    LightField::new([2, 2], [4, 4], views).expect("valid view set")
}

#[test]
fn view_count_mismatch_is_a_load_error() {
    let views = vec![vec![0u8; 16]; 3];
    let err = LightField::new([2, 2], [4, 4], views).unwrap_err();
    assert!(matches!(
        err,
        LightFieldError::ViewCountMismatch {
            expected: 4,
            actual: 3
        }
    ));
}

#[test]
fn view_size_mismatch_is_a_load_error() {
    let views = vec![vec![0u8; 16], vec![0u8; 16], vec![0u8; 15], vec![0u8; 16]];
    let err = LightField::new([2, 2], [4, 4], views).unwrap_err();
    assert!(matches!(err, LightFieldError::ViewSizeMismatch { view: 2, .. }));
}

#[test]
fn converter_output_has_the_full_slm_dimensions() {
    let light_field = all_ones_light_field();
    assert_eq!(light_field.field_dims(), Dims::new(8, 8));
    let field = convert_to_field(&light_field, &DummyBackend, &SeededDiffuser::new(1));
    assert_eq!(field.len(), 64);
}

#[test]
fn converter_is_deterministic_and_magnitude_preserving_under_a_fixed_seed() {
    let light_field = all_ones_light_field();
    let diffuser = SeededDiffuser::new(42);
    let first = convert_to_field(&light_field, &DummyBackend, &diffuser);
    let second = convert_to_field(&light_field, &DummyBackend, &diffuser);
    assert_eq!(first.as_slice(), second.as_slice());

    // The dummy transform and the diffuser only rotate phase, so every
    // output sample keeps the unit input magnitude.
    for sample in first.as_slice() {
        assert!((sample.norm() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn scatter_uses_the_interleaved_output_ordering() {
    // Give every view a distinct constant value; after a magnitude-preserving
    // transform the interleave is directly observable per output sample.
    let (nx, ny) = (2usize, 2usize);
    let (rx, ry) = (3usize, 2usize);
    let mut views = Vec::new();
    for idx_ny in 0..ny {
        for idx_nx in 0..nx {
            views.push(vec![(10 * idx_ny + idx_nx + 1) as u8; rx * ry]);
        }
    }
    let light_field = LightField::new([nx, ny], [rx, ry], views).expect("valid view set");
    let field = convert_to_field(&light_field, &DummyBackend, &SeededDiffuser::new(5));

    for idx_ry in 0..ry {
        for idx_rx in 0..rx {
            for idx_ny in 0..ny {
                for idx_nx in 0..nx {
                    let out_idx =
                        nx * rx * ny * idx_ry + nx * rx * idx_ny + nx * idx_rx + idx_nx;
                    let expected = (10 * idx_ny + idx_nx + 1) as f64;
                    assert!(
                        (field.as_slice()[out_idx].norm() - expected).abs() < 1e-12,
                        "wrong sample at interleaved index {out_idx}"
                    );
                }
            }
        }
    }
}

#[test]
fn diffuser_phases_are_in_range_and_follow_the_product_seeding_rule() {
    let diffuser = SeededDiffuser::new(99);
    for rx in 0..5 {
        for ry in 0..5 {
            let theta = diffuser.phase(rx, ry);
            assert!((0.0..2.0 * PI).contains(&theta));
        }
    }
    // Seeding by the index product means transposed positions share a phase.
    assert_eq!(diffuser.phase(3, 4), diffuser.phase(4, 3));
    assert_eq!(diffuser.phase(2, 6), diffuser.phase(12, 1));
}

#[test]
fn different_seeds_give_different_diffusion() {
    let a = SeededDiffuser::new(1);
    let b = SeededDiffuser::new(2);
    let differs = (1..6usize).any(|i| (a.phase(i, 1) - b.phase(i, 1)).abs() > 1e-12);
    assert!(differs);
}
