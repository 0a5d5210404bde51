//! Single-sideband spectral encoder.
//!
//! Turns a complex hologram field into the real-valued fringe pattern an
//! amplitude-only SLM can display: a double shift-transform-shift round trip
//! through the frequency domain followed by a linear phase-ramp correction
//! that moves the signal band off the conjugate image.

use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::backend::{TransformBackend, TransformBuffer};
use crate::context::{OpticalContext, X, Y};
use crate::field::ComplexField;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Retained fraction of the spectrum per axis.
    #[serde(default = "default_band_limit")]
    pub band_limit: [f64; 2],
    /// Carrier shift of the signal band, in units of the pitch-limited
    /// maximum frequency.
    #[serde(default = "default_spectrum_shift")]
    pub spectrum_shift: [f64; 2],
}

fn default_band_limit() -> [f64; 2] {
    [0.8, 0.5]
}

fn default_spectrum_shift() -> [f64; 2] {
    [0.0, 0.5]
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            band_limit: default_band_limit(),
            spectrum_shift: default_spectrum_shift(),
        }
    }
}

/// Phase-ramp correction factor at physical output coordinates (xx, yy):
/// with `X = pi * xx * shift_x / pp_x` and `Y = pi * yy * shift_y / pp_y`,
/// the factor is `cos X * cos Y - sin X * sin Y`, i.e. 1.0 at the origin.
pub(crate) fn phase_ramp_factor(xx: f64, yy: f64, shift: [f64; 2], pp: [f64; 2]) -> f64 {
    let x = PI * xx * shift[X] / pp[X];
    let y = PI * yy * shift[Y] / pp[Y];
    x.cos() * y.cos() - x.sin() * y.sin()
}

/// Encode a complex field into a real single-sideband fringe pattern of the
/// same pixel dimensions.
///
/// The band-limit crop window is computed and surfaced for diagnosis but not
/// applied as an explicit frequency-domain mask; the reference computation
/// carries these values through unused and relies on the round trip plus the
/// phase ramp. Validate against a known-good hologram before changing this.
pub fn encode_single_sideband<B: TransformBackend>(
    backend: &B,
    ctx: &OpticalContext,
    field: &ComplexField,
    config: &EncodingConfig,
) -> Vec<f64> {
    let pn = ctx.pixel_number();
    let pp = ctx.pixel_pitch();
    let ss = ctx.sensor_size();
    assert_eq!(field.dims(), ctx.dims(), "field dimensions must match the context");

    let cropx = (pn[X] as f64 * config.band_limit[X]).floor();
    let cropx1 = cropx - (cropx / 2.0).floor();
    let cropx2 = cropx1 + cropx - 1.0;
    let cropy = (pn[Y] as f64 * config.band_limit[Y]).floor();
    let cropy1 = cropy - (cropy / 2.0).floor();
    let cropy2 = cropy1 + cropy - 1.0;
    debug!("single-sideband crop window: x {cropx1}..{cropx2}, y {cropy1}..{cropy2}");

    // Centered physical coordinates; the y axis runs top-to-bottom.
    let x_o: Vec<f64> = (0..pn[X])
        .map(|i| -ss[X] / 2.0 + pp[X] * i as f64 + pp[X] / 2.0)
        .collect();
    let y_o: Vec<f64> = (0..pn[Y])
        .map(|j| (ss[Y] - pp[Y]) - pp[Y] * j as f64)
        .collect();

    let mut h = backend.alloc_field(field.dims());
    h.as_mut_slice().copy_from_slice(field.as_slice());

    backend.shift_quadrants(&mut h);
    backend.forward_fft_2d(&mut h);
    backend.shift_quadrants(&mut h);

    backend.shift_quadrants(&mut h);
    backend.inverse_fft_2d(&mut h);
    backend.shift_quadrants(&mut h);

    let data = h.as_slice();
    let mut encoded = vec![0.0; pn[X] * pn[Y]];
    for (i, sample) in encoded.iter_mut().enumerate() {
        let xx = x_o[i % pn[X]];
        let yy = y_o[i / pn[X]];
        *sample = data[i].re * phase_ramp_factor(xx, yy, config.spectrum_shift, pp);
    }
    encoded
}
