#![cfg(test)]

use num_complex::Complex64;

use super::_tests_lightfield::DummyBackend;
use super::context::OpticalContext;
use super::encoder::{encode_single_sideband, phase_ramp_factor, EncodingConfig};
use super::field::{ComplexField, Dims};

fn test_context() -> OpticalContext {
    OpticalContext::new([8, 8], [8e-6, 8e-6], vec![632.8e-9])
}

#[test]
fn phase_ramp_factor_is_one_at_the_coordinate_origin() {
    let factor = phase_ramp_factor(0.0, 0.0, [0.0, 0.5], [8e-6, 8e-6]);
    assert_eq!(factor, 1.0);
}

#[test]
fn encoding_a_zero_field_yields_an_all_zero_buffer() {
    let ctx = test_context();
    let field = ComplexField::zeros(ctx.dims());
    let encoded = encode_single_sideband(&DummyBackend, &ctx, &field, &EncodingConfig::default());
    assert_eq!(encoded.len(), 64);
    assert!(encoded.iter().all(|&v| v == 0.0));
}

#[test]
fn output_matches_context_pixel_dimensions() {
    let ctx = OpticalContext::new([16, 8], [8e-6, 8e-6], vec![632.8e-9]);
    let field = ComplexField::zeros(ctx.dims());
    let encoded = encode_single_sideband(&DummyBackend, &ctx, &field, &EncodingConfig::default());
    assert_eq!(encoded.len(), 16 * 8);
}

#[test]
fn round_trip_with_zero_spectrum_shift_returns_the_real_part() {
    let ctx = test_context();
    let mut field = ComplexField::zeros(ctx.dims());
    for (idx, value) in field.as_mut_slice().iter_mut().enumerate() {
        *value = Complex64::new(idx as f64 - 31.5, (idx % 7) as f64);
    }
    let config = EncodingConfig {
        band_limit: [0.8, 0.5],
        spectrum_shift: [0.0, 0.0],
    };
    let encoded = encode_single_sideband(&DummyBackend, &ctx, &field, &config);
    for (sample, original) in encoded.iter().zip(field.as_slice()) {
        assert!((sample - original.re).abs() < 1e-9);
    }
}

#[test]
fn spectrum_shift_applies_the_row_and_column_ramp() {
    let ctx = test_context();
    let pp = ctx.pixel_pitch();
    let ss = ctx.sensor_size();
    let mut field = ComplexField::zeros(ctx.dims());
    field.fill(Complex64::new(1.0, 0.0));

    let config = EncodingConfig {
        band_limit: [0.8, 0.5],
        spectrum_shift: [0.0, 0.5],
    };
    let encoded = encode_single_sideband(&DummyBackend, &ctx, &field, &config);
    for (i, sample) in encoded.iter().enumerate() {
        let xx = -ss[0] / 2.0 + pp[0] * (i % 8) as f64 + pp[0] / 2.0;
        let yy = (ss[1] - pp[1]) - pp[1] * (i / 8) as f64;
        let expected = phase_ramp_factor(xx, yy, config.spectrum_shift, pp);
        assert!((sample - expected).abs() < 1e-9, "ramp mismatch at {i}");
    }
}

#[test]
#[should_panic(expected = "field dimensions must match the context")]
fn mismatched_field_dimensions_are_rejected() {
    let ctx = test_context();
    let field = ComplexField::zeros(Dims::new(4, 4));
    let _ = encode_single_sideband(&DummyBackend, &ctx, &field, &EncodingConfig::default());
}
