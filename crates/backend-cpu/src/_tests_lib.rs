#![cfg(test)]

use num_complex::Complex64;

use cgh2d_core::backend::TransformBackend;
use cgh2d_core::context::OpticalContext;
use cgh2d_core::encoder::{encode_single_sideband, EncodingConfig};
use cgh2d_core::field::{ComplexField, Dims};
use cgh2d_core::kernel;
use cgh2d_core::lightfield::{convert_to_field, LightField, SeededDiffuser};
use cgh2d_core::propagation::fresnel_propagation;

use super::CpuBackend;

#[test]
fn forward_fft_of_impulse_is_flat_spectrum() {
    let backend = CpuBackend::new();
    let mut field = backend.alloc_field(Dims::new(8, 4));
    field.as_mut_slice()[0] = Complex64::new(1.0, 0.0);
    backend.forward_fft_2d(&mut field);
    for value in field.as_slice() {
        assert!((value - Complex64::new(1.0, 0.0)).norm() < 1e-12);
    }
}

#[test]
fn forward_then_inverse_is_identity_up_to_roundoff() {
    let backend = CpuBackend::new();
    let dims = Dims::new(16, 8);
    let mut field = backend.alloc_field(dims);
    for (idx, value) in field.as_mut_slice().iter_mut().enumerate() {
        *value = Complex64::from_polar(1.0 + idx as f64 * 0.1, idx as f64 * 0.3);
    }
    let before = field.as_slice().to_vec();
    backend.forward_fft_2d(&mut field);
    backend.inverse_fft_2d(&mut field);
    for (orig, after) in before.iter().zip(field.as_slice()) {
        assert!((orig - after).norm() < 1e-9);
    }
}

#[test]
fn shift_moves_dc_to_center_and_is_an_involution_for_even_dims() {
    let backend = CpuBackend::new();
    let dims = Dims::new(8, 6);
    let mut field = backend.alloc_field(dims);
    field.as_mut_slice()[0] = Complex64::new(1.0, 0.0);
    let before = field.as_slice().to_vec();

    backend.shift_quadrants(&mut field);
    let center = dims.idx(dims.nx / 2, dims.ny / 2);
    assert_eq!(field.as_slice()[center], Complex64::new(1.0, 0.0));

    backend.shift_quadrants(&mut field);
    assert_eq!(field.as_slice(), before.as_slice());
}

#[test]
fn converter_places_one_dc_sample_per_view_pixel_block() {
    let backend = CpuBackend::new();
    let num = [2usize, 2usize];
    let res = [4usize, 4usize];
    let views = vec![vec![1u8; res[0] * res[1]]; num[0] * num[1]];
    let light_field = LightField::new(num, res, views).expect("valid view set");
    let diffuser = SeededDiffuser::new(7);

    let field = convert_to_field(&light_field, &backend, &diffuser);
    assert_eq!(field.len(), 64);

    // An all-ones 2x2 sub-image transforms to a single DC sample of
    // magnitude 4, shifted to (1, 1); the diffuser only rotates phase.
    let (nx, ny) = (num[0], num[1]);
    let (rx, ry) = (res[0], res[1]);
    let mut dc_count = 0;
    for idx_ry in 0..ry {
        for idx_rx in 0..rx {
            for idx_ny in 0..ny {
                for idx_nx in 0..nx {
                    let sample = field.as_slice()
                        [nx * rx * ny * idx_ry + nx * rx * idx_ny + nx * idx_rx + idx_nx];
                    if idx_nx == 1 && idx_ny == 1 {
                        assert!((sample.norm() - 4.0).abs() < 1e-9);
                        dc_count += 1;
                    } else {
                        assert!(sample.norm() < 1e-9);
                    }
                }
            }
        }
    }
    assert_eq!(dc_count, rx * ry);

    let again = convert_to_field(&light_field, &backend, &diffuser);
    assert_eq!(field.as_slice(), again.as_slice());
}

#[test]
fn back_propagating_a_fresnel_point_hologram_refocuses_at_the_center() {
    let backend = CpuBackend::new();
    let wavelength = 632.8e-9;
    let z = 0.005;
    let ctx = OpticalContext::new([64, 64], [8e-6, 8e-6], vec![wavelength]);
    let k = ctx.wavenumber(0);

    let mut field = ComplexField::zeros(ctx.dims());
    kernel::diffract_fresnel(&mut field, &ctx, wavelength, k, [0.0, 0.0, z], 1.0);

    let refocused = fresnel_propagation(&backend, &ctx, wavelength, &field, -z);

    let mut best = (0usize, 0usize, 0.0f64);
    for iy in 0..64 {
        for ix in 0..64 {
            let mag = refocused.get(ix, iy).norm();
            if mag > best.2 {
                best = (ix, iy, mag);
            }
        }
    }
    // Point at (0, 0) maps to pixel (33, 32) under the kernel's coordinate
    // convention; the focused spot must land there.
    assert!((best.0 as i64 - 33).abs() <= 2, "peak x at {}", best.0);
    assert!((best.1 as i64 - 32).abs() <= 2, "peak y at {}", best.1);
}

#[test]
fn encoding_a_zero_field_yields_a_zero_buffer() {
    let backend = CpuBackend::new();
    let ctx = OpticalContext::new([16, 16], [8e-6, 8e-6], vec![632.8e-9]);
    let field = ComplexField::zeros(ctx.dims());
    let encoded = encode_single_sideband(&backend, &ctx, &field, &EncodingConfig::default());
    assert_eq!(encoded.len(), 256);
    assert!(encoded.iter().all(|&v| v == 0.0));
}

#[test]
fn encoder_round_trip_reduces_to_the_phase_ramp() {
    let backend = CpuBackend::new();
    let ctx = OpticalContext::new([8, 8], [8e-6, 8e-6], vec![632.8e-9]);
    let mut field = ComplexField::zeros(ctx.dims());
    for (idx, value) in field.as_mut_slice().iter_mut().enumerate() {
        *value = Complex64::new(idx as f64 * 0.25 - 3.0, (idx % 5) as f64);
    }

    // The double shift-transform-shift round trip is the identity on even
    // grids, so the output is the real part scaled by the ramp factor; with
    // a zero spectrum shift the ramp factor is exactly 1.
    let config = EncodingConfig {
        band_limit: [0.8, 0.5],
        spectrum_shift: [0.0, 0.0],
    };
    let encoded = encode_single_sideband(&backend, &ctx, &field, &config);
    for (sample, original) in encoded.iter().zip(field.as_slice()) {
        assert!((sample - original.re).abs() < 1e-9);
    }
}
