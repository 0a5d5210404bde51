//! Process-wide optical configuration.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

pub const X: usize = 0;
pub const Y: usize = 1;
pub const Z: usize = 2;

/// Optical configuration shared by every pipeline stage.
///
/// Immutable after construction: the physical sensor size is derived from
/// pixel count and pitch exactly once, so the `size = count * pitch`
/// invariant cannot drift.
///
/// A zero pixel pitch is a scene/config precondition violation; it is not
/// checked here and leads to division by zero in the diffraction kernels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpticalContext {
    pixel_number: [usize; 2],
    pixel_pitch: [f64; 2],
    wavelengths: Vec<f64>,
    sensor_size: [f64; 2],
}

impl OpticalContext {
    pub fn new(pixel_number: [usize; 2], pixel_pitch: [f64; 2], wavelengths: Vec<f64>) -> Self {
        assert!(
            pixel_number[X] > 0 && pixel_number[Y] > 0,
            "pixel number must be non-zero on both axes"
        );
        assert!(!wavelengths.is_empty(), "at least one wavelength channel is required");
        let sensor_size = [
            pixel_number[X] as f64 * pixel_pitch[X],
            pixel_number[Y] as f64 * pixel_pitch[Y],
        ];
        Self {
            pixel_number,
            pixel_pitch,
            wavelengths,
            sensor_size,
        }
    }

    pub fn pixel_number(&self) -> [usize; 2] {
        self.pixel_number
    }

    pub fn pixel_pitch(&self) -> [f64; 2] {
        self.pixel_pitch
    }

    /// Physical sensor size, `pixel_number * pixel_pitch` per axis.
    pub fn sensor_size(&self) -> [f64; 2] {
        self.sensor_size
    }

    pub fn channels(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn wavelength(&self, channel: usize) -> f64 {
        self.wavelengths[channel]
    }

    /// Wavenumber k = 2π/λ of the given channel.
    pub fn wavenumber(&self, channel: usize) -> f64 {
        2.0 * PI / self.wavelengths[channel]
    }

    pub fn dims(&self) -> crate::field::Dims {
        crate::field::Dims::new(self.pixel_number[X], self.pixel_number[Y])
    }
}
