#![cfg(test)]

use num_complex::Complex64;

use super::context::OpticalContext;
use super::field::ComplexField;
use super::kernel::{self, CullWindow};

const WAVELENGTH: f64 = 632.8e-9;

fn small_context() -> OpticalContext {
    OpticalContext::new([64, 64], [8e-6, 8e-6], vec![WAVELENGTH])
}

#[test]
fn culling_windows_match_the_frequency_limited_cone() {
    let ctx = small_context();
    let pc = [0.0, 0.0, 0.005];
    // lambda*z/(2*pp) = 197.75 um against a 512 um sensor: the cone covers
    // pixels 8..57 on both axes.
    let expected = CullWindow {
        x_lo: 8,
        x_hi: 57,
        y_lo: 8,
        y_hi: 57,
    };
    assert_eq!(kernel::fresnel_window(&ctx, WAVELENGTH, pc), expected);
    // The exact tangent mapping differs only past the fourth decimal at this
    // aperture, landing in the same pixel window.
    assert_eq!(kernel::rs_window(&ctx, WAVELENGTH, pc), expected);
}

#[test]
fn rs_contribution_is_confined_to_the_culling_window() {
    let ctx = small_context();
    let k = ctx.wavenumber(0);
    let pc = [0.0, 0.0, 0.005];
    let window = kernel::rs_window(&ctx, WAVELENGTH, pc);
    assert!(window.x_lo > 0 && window.x_hi < 64);
    assert!(window.y_lo > 0 && window.y_hi < 64);

    let mut field = ComplexField::zeros(ctx.dims());
    kernel::diffract_rs(&mut field, &ctx, WAVELENGTH, k, pc, 1.0);

    let mut inside_nonzero = 0;
    for iy in 0..64 {
        for ix in 0..64 {
            let value = *field.get(ix, iy);
            if !window.contains(ix, iy) {
                assert_eq!(value, Complex64::new(0.0, 0.0), "leak at ({ix}, {iy})");
            } else if value != Complex64::new(0.0, 0.0) {
                inside_nonzero += 1;
            }
        }
    }
    assert!(inside_nonzero > 0, "window received no contribution");
}

#[test]
fn window_entirely_off_sensor_evaluates_zero_pixels() {
    let ctx = small_context();
    let k = ctx.wavenumber(0);
    // A point a meter off-axis at shallow depth subtends no sensor pixel.
    let pc = [1.0, 0.0, 0.001];
    let mut field = ComplexField::zeros(ctx.dims());
    kernel::diffract_rs(&mut field, &ctx, WAVELENGTH, k, pc, 1.0);
    assert!(
        field
            .as_slice()
            .iter()
            .all(|v| *v == Complex64::new(0.0, 0.0))
    );
}

#[test]
fn rs_peak_magnitude_sits_at_the_image_center() {
    let ctx = OpticalContext::new([256, 256], [8e-6, 8e-6], vec![WAVELENGTH]);
    let k = ctx.wavenumber(0);
    let mut field = ComplexField::zeros(ctx.dims());
    kernel::diffract_rs(&mut field, &ctx, WAVELENGTH, k, [0.0, 0.0, 0.5], 1.0);

    let mut best = (0usize, 0usize, 0.0f64);
    for iy in 0..256 {
        for ix in 0..256 {
            let mag = field.get(ix, iy).norm();
            if mag > best.2 {
                best = (ix, iy, mag);
            }
        }
    }
    // Physical (0, 0) lands on pixel (129, 128) under the kernel's mapping,
    // within one pixel of the image center.
    assert!((best.0 as i64 - 128).abs() <= 1, "peak x at {}", best.0);
    assert!((best.1 as i64 - 128).abs() <= 1, "peak y at {}", best.1);
}

#[test]
fn fresnel_zone_pattern_is_centered_and_has_the_analytic_center_value() {
    let z = 0.5;
    let ctx = OpticalContext::new([256, 256], [8e-6, 8e-6], vec![WAVELENGTH]);
    let k = ctx.wavenumber(0);
    let mut field = ComplexField::zeros(ctx.dims());
    kernel::diffract_fresnel(&mut field, &ctx, WAVELENGTH, k, [0.0, 0.0, z], 1.0);

    // At (129, 128) both point-relative coordinates vanish, so
    // p = k*z exactly.
    let p = k * z;
    let expected = Complex64::new(p.sin(), -p.cos()) / (WAVELENGTH * z);
    let center = *field.get(129, 128);
    assert!((center - expected).norm() < expected.norm() * 1e-9);

    // The chirp is symmetric about that pixel on both axes.
    for d in 1..40usize {
        let right = *field.get(129 + d, 128);
        let left = *field.get(129 - d, 128);
        assert!((right - left).norm() < expected.norm() * 1e-9, "x asymmetry at d={d}");
        let down = *field.get(129, 128 + d);
        let up = *field.get(129, 128 - d);
        assert!((down - up).norm() < expected.norm() * 1e-9, "y asymmetry at d={d}");
    }
}
