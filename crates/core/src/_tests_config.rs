#![cfg(test)]

use super::config::{ConfigError, RunConfig, SourceType};
use super::pointcloud::DiffractionMethod;

const POINTCLOUD_TOML: &str = r#"
[context]
pixel_pitch = [8e-6, 8e-6]
pixel_number = [256, 256]
wavelengths = [632.8e-9]

[source]
type = "pointcloud"

[pointcloud]
path = "scene.xyz"
scale = [0.01, 0.01, 0.01]
offset_depth = 0.5
diffraction = "fresnel"

[encoding]
band_limit = [0.8, 0.5]
spectrum_shift = [0.0, 0.5]
"#;

const LIGHTFIELD_TOML: &str = r#"
[context]
pixel_pitch = [8e-6, 8e-6]
wavelengths = [632.8e-9]

[source]
type = "lightfield"

[lightfield]
directory = "views"
num_image = [10, 10]
resolution_image = [160, 90]
distance = 0.5
phase_seed = 7
"#;

#[test]
fn pointcloud_config_parses_and_validates() {
    let config: RunConfig = toml::from_str(POINTCLOUD_TOML).expect("should parse");
    config.validate().expect("should validate");
    assert_eq!(config.source_type(), SourceType::PointCloud);

    let section = config.pointcloud.as_ref().expect("section present");
    assert_eq!(section.diffraction, DiffractionMethod::Fresnel);
    let builder = section.builder_config();
    assert_eq!(builder.scale, [0.01, 0.01, 0.01]);
    assert_eq!(builder.offset_depth, 0.5);

    let ctx = config.build_context().expect("context");
    assert_eq!(ctx.pixel_number(), [256, 256]);
    assert_eq!(ctx.channels(), 1);
}

#[test]
fn lightfield_pixel_number_is_derived_from_view_geometry() {
    let config: RunConfig = toml::from_str(LIGHTFIELD_TOML).expect("should parse");
    config.validate().expect("should validate");

    let ctx = config.build_context().expect("context");
    assert_eq!(ctx.pixel_number(), [1600, 900]);
    assert_eq!(config.lightfield.as_ref().unwrap().phase_seed, 7);
}

#[test]
fn conflicting_declared_pixel_number_is_rejected() {
    let mut config: RunConfig = toml::from_str(LIGHTFIELD_TOML).expect("should parse");
    config.context.pixel_number = Some([1024, 1024]);
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::DimensionConflict { .. }));
}

#[test]
fn missing_source_section_is_rejected() {
    let mut config: RunConfig = toml::from_str(POINTCLOUD_TOML).expect("should parse");
    config.pointcloud = None;
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::MissingSection("pointcloud")));
}

#[test]
fn pointcloud_runs_require_an_explicit_pixel_number() {
    let mut config: RunConfig = toml::from_str(POINTCLOUD_TOML).expect("should parse");
    config.context.pixel_number = None;
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidContext(_)
    ));
}

#[test]
fn non_positive_pitch_is_rejected() {
    let mut config: RunConfig = toml::from_str(POINTCLOUD_TOML).expect("should parse");
    config.context.pixel_pitch = [0.0, 8e-6];
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidContext(_)
    ));
}

#[test]
fn viewing_window_without_field_lens_is_rejected() {
    let mut config: RunConfig = toml::from_str(POINTCLOUD_TOML).expect("should parse");
    config.pointcloud.as_mut().unwrap().viewing_window = true;
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidSource(_)
    ));
}

#[test]
fn encoding_defaults_follow_the_reference_call_site() {
    let toml_without_encoding = POINTCLOUD_TOML
        .split("[encoding]")
        .next()
        .expect("prefix");
    let config: RunConfig = toml::from_str(toml_without_encoding).expect("should parse");
    assert_eq!(config.encoding.band_limit, [0.8, 0.5]);
    assert_eq!(config.encoding.spectrum_shift, [0.0, 0.5]);
}
