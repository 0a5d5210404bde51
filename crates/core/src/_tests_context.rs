#![cfg(test)]

use std::f64::consts::PI;

use super::context::OpticalContext;

#[test]
fn sensor_size_is_pixel_count_times_pitch() {
    let ctx = OpticalContext::new([1024, 768], [8e-6, 4e-6], vec![632.8e-9]);
    let ss = ctx.sensor_size();
    assert!((ss[0] - 1024.0 * 8e-6).abs() < 1e-15);
    assert!((ss[1] - 768.0 * 4e-6).abs() < 1e-15);
}

#[test]
fn wavenumber_is_two_pi_over_wavelength() {
    let ctx = OpticalContext::new([16, 16], [8e-6, 8e-6], vec![632.8e-9, 520e-9]);
    assert_eq!(ctx.channels(), 2);
    assert!((ctx.wavenumber(0) - 2.0 * PI / 632.8e-9).abs() < 1e-3);
    assert!((ctx.wavenumber(1) - 2.0 * PI / 520e-9).abs() < 1e-3);
}

#[test]
fn dims_match_pixel_number() {
    let ctx = OpticalContext::new([32, 16], [8e-6, 8e-6], vec![632.8e-9]);
    let dims = ctx.dims();
    assert_eq!(dims.nx, 32);
    assert_eq!(dims.ny, 16);
    assert_eq!(dims.len(), 512);
}

#[test]
#[should_panic(expected = "pixel number must be non-zero")]
fn zero_pixel_count_is_rejected() {
    let _ = OpticalContext::new([0, 16], [8e-6, 8e-6], vec![632.8e-9]);
}

#[test]
#[should_panic(expected = "at least one wavelength")]
fn empty_wavelength_list_is_rejected() {
    let _ = OpticalContext::new([16, 16], [8e-6, 8e-6], vec![]);
}
