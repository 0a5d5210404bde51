//! Scene-loading collaborators: point-cloud text files, light-field image
//! directories, and the normalized fringe-pattern writer.
//!
//! Loaders validate against the declared geometry and fail before any field
//! buffer is allocated, so a rejected scene leaves no partial state.

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageReader;
use log::info;
use thiserror::Error;

use cgh2d_core::lightfield::{LightField, LightFieldError};
use cgh2d_core::pointcloud::PointCloud;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{path}:{line}: {message}")]
    PointParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("point cloud {0} contains no points")]
    EmptyCloud(PathBuf),

    #[error("expected {expected} light-field images in {directory}, found {found}")]
    ViewCount {
        directory: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("view {path} is {actual_w}x{actual_h}, expected {expected_w}x{expected_h}")]
    ViewResolution {
        path: PathBuf,
        expected_w: usize,
        expected_h: usize,
        actual_w: usize,
        actual_h: usize,
    },

    #[error(transparent)]
    LightField(#[from] LightFieldError),
}

/// Load a point cloud from a whitespace-separated text file.
///
/// One record per line: `x y z c0 [c1 c2 ..]`. Every line must carry the
/// same number of color columns; `#`-prefixed lines and blank lines are
/// skipped.
pub fn load_point_cloud(path: &Path) -> Result<PointCloud, SceneError> {
    let content = fs::read_to_string(path)?;
    let mut points = Vec::new();
    let mut colors = Vec::new();
    let mut color_channels = 0usize;

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parse_err = |message: String| SceneError::PointParse {
            path: path.to_path_buf(),
            line: line_no + 1,
            message,
        };
        let fields: Vec<f64> = line
            .split_whitespace()
            .map(|field| field.parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| parse_err(e.to_string()))?;
        if fields.len() < 4 {
            return Err(parse_err(format!(
                "expected at least 4 columns (x y z c), got {}",
                fields.len()
            )));
        }
        let channels = fields.len() - 3;
        if color_channels == 0 {
            color_channels = channels;
        } else if channels != color_channels {
            return Err(parse_err(format!(
                "inconsistent color columns: {channels} here, {color_channels} before"
            )));
        }
        points.extend_from_slice(&fields[..3]);
        colors.extend_from_slice(&fields[3..]);
    }

    if points.is_empty() {
        return Err(SceneError::EmptyCloud(path.to_path_buf()));
    }
    info!(
        "loaded {} points with {} color channel(s) from {}",
        points.len() / 3,
        color_channels,
        path.display()
    );
    Ok(PointCloud::new(points, colors, color_channels))
}

/// Load a light-field view set from a directory of images.
///
/// Files are consumed in sorted filename order, giving a deterministic
/// view sequence independent of filesystem iteration order. Each image is
/// decoded to 8-bit grayscale and checked against the declared resolution.
pub fn load_light_field(
    directory: &Path,
    num_image: [usize; 2],
    resolution: [usize; 2],
) -> Result<LightField, SceneError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(directory)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let expected = num_image[0] * num_image[1];
    if paths.len() != expected {
        return Err(SceneError::ViewCount {
            directory: directory.to_path_buf(),
            expected,
            found: paths.len(),
        });
    }

    let mut views = Vec::with_capacity(expected);
    for path in &paths {
        let gray = ImageReader::open(path)?.decode()?.into_luma8();
        let (w, h) = (gray.width() as usize, gray.height() as usize);
        if w != resolution[0] || h != resolution[1] {
            return Err(SceneError::ViewResolution {
                path: path.clone(),
                expected_w: resolution[0],
                expected_h: resolution[1],
                actual_w: w,
                actual_h: h,
            });
        }
        views.push(gray.into_raw());
    }
    info!(
        "loaded {} light-field views from {}",
        views.len(),
        directory.display()
    );
    Ok(LightField::new(num_image, resolution, views)?)
}

/// Min-max normalize an encoded buffer to 8-bit and write it as a grayscale
/// PNG. A constant buffer maps to black.
pub fn write_normalized_png(
    path: &Path,
    encoded: &[f64],
    width: usize,
    height: usize,
) -> Result<(), SceneError> {
    assert_eq!(encoded.len(), width * height, "buffer must match dimensions");
    let min = encoded.iter().copied().fold(f64::INFINITY, f64::min);
    let max = encoded.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let pixels: Vec<u8> = encoded
        .iter()
        .map(|&v| {
            if span > 0.0 {
                ((v - min) / span * 255.0).round() as u8
            } else {
                0
            }
        })
        .collect();

    let img = image::GrayImage::from_raw(width as u32, height as u32, pixels)
        .expect("pixel buffer matches dimensions");
    img.save(path)?;
    Ok(())
}
