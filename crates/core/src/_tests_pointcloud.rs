#![cfg(test)]

use num_complex::Complex64;

use super::context::OpticalContext;
use super::field::ComplexField;
use super::kernel;
use super::pointcloud::{
    generate, transform_viewing_window, DiffractionMethod, PointCloud, PointCloudConfig,
};

const WAVELENGTH: f64 = 632.8e-9;

fn test_context() -> OpticalContext {
    OpticalContext::new([32, 32], [8e-6, 8e-6], vec![WAVELENGTH])
}

fn test_cloud() -> PointCloud {
    // A dozen points spread over the sensor cone at varying depth and
    // amplitude; several pairs illuminate overlapping pixel regions.
    let mut points = Vec::new();
    let mut colors = Vec::new();
    for i in 0..12usize {
        let f = i as f64;
        points.extend_from_slice(&[
            (f - 6.0) * 1.5e-5,
            (5.0 - f) * 1.2e-5,
            4e-3 + f * 2.5e-4,
        ]);
        colors.push(0.25 + 0.05 * f);
    }
    PointCloud::new(points, colors, 1)
}

#[test]
fn parallel_accumulation_matches_sequential_reference() {
    let ctx = test_context();
    let cloud = test_cloud();
    let config = PointCloudConfig {
        scale: [1.0, 1.0, 1.0],
        offset_depth: 1e-3,
        diffraction: DiffractionMethod::RayleighSommerfeld,
        ..PointCloudConfig::default()
    };

    let parallel = generate(&cloud, &config, &ctx);
    assert_eq!(parallel.len(), 1);

    let mut sequential = ComplexField::zeros(ctx.dims());
    let k = ctx.wavenumber(0);
    for i in 0..cloud.len() {
        let [x, y, mut z] = cloud.position(i);
        z += config.offset_depth;
        kernel::diffract_rs(&mut sequential, &ctx, WAVELENGTH, k, [x, y, z], cloud.amplitude(i, 0));
    }

    for (par, seq) in parallel[0].as_slice().iter().zip(sequential.as_slice()) {
        assert!(
            (par - seq).norm() <= 1e-9 * (1.0 + seq.norm()),
            "accumulation mismatch: {par} vs {seq}"
        );
    }
}

#[test]
fn fresnel_mode_accumulates_every_point() {
    let ctx = test_context();
    let cloud = test_cloud();
    let config = PointCloudConfig {
        diffraction: DiffractionMethod::Fresnel,
        ..PointCloudConfig::default()
    };

    let fields = generate(&cloud, &config, &ctx);
    let mut sequential = ComplexField::zeros(ctx.dims());
    let k = ctx.wavenumber(0);
    for i in 0..cloud.len() {
        kernel::diffract_fresnel(
            &mut sequential,
            &ctx,
            WAVELENGTH,
            k,
            cloud.position(i),
            cloud.amplitude(i, 0),
        );
    }
    for (par, seq) in fields[0].as_slice().iter().zip(sequential.as_slice()) {
        assert!((par - seq).norm() <= 1e-9 * (1.0 + seq.norm()));
    }
}

#[test]
fn zero_amplitude_points_leave_the_field_zero() {
    let ctx = test_context();
    let points = vec![0.0, 0.0, 5e-3, 1e-5, -1e-5, 6e-3];
    let colors = vec![0.0, 0.0];
    let cloud = PointCloud::new(points, colors, 1);
    let fields = generate(&cloud, &PointCloudConfig::default(), &ctx);
    assert!(
        fields[0]
            .as_slice()
            .iter()
            .all(|v| *v == Complex64::new(0.0, 0.0))
    );
}

#[test]
fn one_field_per_wavelength_channel_with_monochrome_fallback() {
    let ctx = OpticalContext::new([32, 32], [8e-6, 8e-6], vec![638e-9, 520e-9, 450e-9]);
    let cloud = PointCloud::new(vec![0.0, 0.0, 5e-3], vec![0.8], 1);
    assert_eq!(cloud.amplitude(0, 2), 0.8);

    let fields = generate(&cloud, &PointCloudConfig::default(), &ctx);
    assert_eq!(fields.len(), 3);
    // Different wavelengths produce different fringes from the same point.
    let a = fields[0].as_slice();
    let b = fields[1].as_slice();
    assert!(a.iter().zip(b).any(|(x, y)| (x - y).norm() > 1e-12));
}

#[test]
fn multichannel_cloud_uses_the_matching_color_column() {
    let cloud = PointCloud::new(vec![0.0, 0.0, 1.0], vec![0.1, 0.2, 0.3], 3);
    assert_eq!(cloud.amplitude(0, 0), 0.1);
    assert_eq!(cloud.amplitude(0, 1), 0.2);
    assert_eq!(cloud.amplitude(0, 2), 0.3);
}

#[test]
fn viewing_window_keeps_the_origin_fixed() {
    assert_eq!(transform_viewing_window(0.35, 0.0), 0.0);
}

#[test]
fn viewing_window_is_singular_at_the_field_lens_distance() {
    // src == field_lens divides by zero; the result is non-finite by design.
    let out = transform_viewing_window(0.35, 0.35);
    assert!(!out.is_finite());
}

#[test]
fn viewing_window_transform_is_applied_before_scaling() {
    let ctx = test_context();
    let field_lens = 0.5;
    let src = 0.1;
    let cloud = PointCloud::new(vec![0.0, 0.0, src], vec![1.0], 1);
    let config = PointCloudConfig {
        field_lens,
        viewing_window: true,
        diffraction: DiffractionMethod::Fresnel,
        ..PointCloudConfig::default()
    };

    let transformed = generate(&cloud, &config, &ctx);

    let mut expected = ComplexField::zeros(ctx.dims());
    let remapped = transform_viewing_window(field_lens, src);
    kernel::diffract_fresnel(
        &mut expected,
        &ctx,
        WAVELENGTH,
        ctx.wavenumber(0),
        [0.0, 0.0, remapped],
        1.0,
    );
    for (got, want) in transformed[0].as_slice().iter().zip(expected.as_slice()) {
        assert!((got - want).norm() <= 1e-9 * (1.0 + want.norm()));
    }
}

#[test]
#[should_panic(expected = "colors length must be n_points * color_channels")]
fn point_cloud_rejects_mismatched_color_length() {
    let _ = PointCloud::new(vec![0.0, 0.0, 1.0], vec![1.0, 2.0], 1);
}
