//! Point-to-plane diffraction kernels with spatial-frequency culling.
//!
//! Both kernels accumulate into a shared complex field buffer and restrict
//! their pixel loops to a rectangular window derived from the SLM's
//! anti-aliasing limit: fringes steeper than the pitch-limited half-angle
//! tangent `t = lambda / (2 * pitch)` would alias, so pixels outside the
//! cone that a point subtends under that half-angle receive no contribution.
//!
//! Input-validity requirement: a point depth of zero or a zero pixel pitch
//! divides by zero and propagates NaN/Inf into the buffer. This is a scene /
//! configuration precondition, deliberately not guarded here.

use num_complex::Complex64;

use crate::context::{OpticalContext, X, Y, Z};
use crate::field::ComplexField;

/// Pixel-index window actually evaluated for one point.
///
/// Half-open on both axes: `x` runs over `x_lo..x_hi`, `y` over `y_lo..y_hi`.
/// An inverted or empty window after clamping evaluates zero pixels; it is
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CullWindow {
    pub x_lo: usize,
    pub x_hi: usize,
    pub y_lo: usize,
    pub y_hi: usize,
}

impl CullWindow {
    pub fn contains(&self, ix: usize, iy: usize) -> bool {
        ix >= self.x_lo && ix < self.x_hi && iy >= self.y_lo && iy < self.y_hi
    }
}

/// Culling window for the Rayleigh-Sommerfeld kernel.
///
/// The physical half-width of the illuminated region at depth `z` is
/// `|t / sqrt(1 - t^2) * z|` per axis with `t = lambda / (2 * pitch)`.
pub fn rs_window(ctx: &OpticalContext, wavelength: f64, pc: [f64; 3]) -> CullWindow {
    let pp = ctx.pixel_pitch();
    let tx = wavelength / (2.0 * pp[X]);
    let ty = wavelength / (2.0 * pp[Y]);
    let x_off = (tx / (1.0 - tx * tx).sqrt() * pc[Z]).abs();
    let y_off = (ty / (1.0 - ty * ty).sqrt() * pc[Z]).abs();
    window_from_offsets(ctx, pc, x_off, y_off)
}

/// Culling window for the paraxial Fresnel kernel, using the small-angle
/// half-width `|lambda * z / (2 * pitch)|`.
pub fn fresnel_window(ctx: &OpticalContext, wavelength: f64, pc: [f64; 3]) -> CullWindow {
    let pp = ctx.pixel_pitch();
    let x_off = (wavelength * pc[Z] / (2.0 * pp[X])).abs();
    let y_off = (wavelength * pc[Z] / (2.0 * pp[Y])).abs();
    window_from_offsets(ctx, pc, x_off, y_off)
}

/// Map physical bounds around the point to pixel indices.
///
/// The x axis counts left-to-right while the y axis is inverted top-to-bottom,
/// so the y mapping subtracts from the pixel count and swaps which physical
/// bound produces the low index.
fn window_from_offsets(ctx: &OpticalContext, pc: [f64; 3], x_off: f64, y_off: f64) -> CullWindow {
    let pn = ctx.pixel_number();
    let pp = ctx.pixel_pitch();
    let ss = ctx.sensor_size();

    let x_hi = ((pc[X] + x_off + ss[X] / 2.0) / pp[X]).floor() + 1.0;
    let x_lo = ((pc[X] - x_off + ss[X] / 2.0) / pp[X]).floor() + 1.0;
    let y_hi = pn[Y] as f64 - ((pc[Y] - y_off + ss[Y] / 2.0) / pp[Y]).floor();
    let y_lo = pn[Y] as f64 - ((pc[Y] + y_off + ss[Y] / 2.0) / pp[Y]).floor();

    CullWindow {
        x_lo: x_lo.max(0.0) as usize,
        x_hi: x_hi.min(pn[X] as f64).max(0.0) as usize,
        y_lo: y_lo.max(0.0) as usize,
        y_hi: y_hi.min(pn[Y] as f64).max(0.0) as usize,
    }
}

/// Rayleigh-Sommerfeld point-to-plane diffraction.
///
/// For each window pixel at physical coordinates (xxx, yyy):
/// `r = sqrt((xxx - x)^2 + (yyy - y)^2 + z^2)` and the contribution is
/// `A * z * (sin(kr), -cos(kr)) / (lambda * r^2)`. A per-pixel range check
/// refines the rectangular window to the elliptical aliasing-free region.
pub fn diffract_rs(
    field: &mut ComplexField,
    ctx: &OpticalContext,
    wavelength: f64,
    k: f64,
    pc: [f64; 3],
    amplitude: f64,
) {
    let pn = ctx.pixel_number();
    let pp = ctx.pixel_pitch();
    let ss = ctx.sensor_size();
    let tx = wavelength / (2.0 * pp[X]);
    let ty = wavelength / (2.0 * pp[Y]);
    let window = rs_window(ctx, wavelength, pc);
    let data = field.as_mut_slice();

    for xxtr in window.x_lo..window.x_hi {
        for yytr in window.y_lo..window.y_hi {
            let xxx = -ss[X] / 2.0 + (xxtr as f64 - 1.0) * pp[X];
            let yyy = -ss[Y] / 2.0 + (pn[Y] as f64 - yytr as f64) * pp[Y];

            let dx = xxx - pc[X];
            let dy = yyy - pc[Y];
            let r = (dx * dx + dy * dy + pc[Z] * pc[Z]).sqrt();

            let reach_x = (tx / (1.0 - tx * tx).sqrt() * (dy * dy + pc[Z] * pc[Z]).sqrt()).abs();
            let reach_y = (ty / (1.0 - ty * ty).sqrt() * (dx * dx + pc[Z] * pc[Z]).sqrt()).abs();

            if xxx < pc[X] + reach_x
                && xxx > pc[X] - reach_x
                && yyy < pc[Y] + reach_y
                && yyy > pc[Y] - reach_y
            {
                let kr = k * r;
                let res_real = amplitude * pc[Z] * kr.sin() / (wavelength * r * r);
                let res_imag = -amplitude * pc[Z] * kr.cos() / (wavelength * r * r);
                data[xxtr + yytr * pn[X]] += Complex64::new(res_real, res_imag);
            }
        }
    }
}

/// Paraxial Fresnel point-to-plane diffraction.
///
/// With point-relative coordinates, `p = k * (xxx^2 + yyy^2 + 2 z^2) / (2 z)`
/// and the contribution is `A * (sin(p), -cos(p)) / (lambda * z)`.
pub fn diffract_fresnel(
    field: &mut ComplexField,
    ctx: &OpticalContext,
    wavelength: f64,
    k: f64,
    pc: [f64; 3],
    amplitude: f64,
) {
    let pn = ctx.pixel_number();
    let pp = ctx.pixel_pitch();
    let ss = ctx.sensor_size();
    let window = fresnel_window(ctx, wavelength, pc);
    let data = field.as_mut_slice();

    for yytr in window.y_lo..window.y_hi {
        for xxtr in window.x_lo..window.x_hi {
            let xxx = (-ss[X] / 2.0 + (xxtr as f64 - 1.0) * pp[X]) - pc[X];
            let yyy = (-ss[Y] / 2.0 + (pn[Y] as f64 - yytr as f64) * pp[Y]) - pc[Y];
            let p = k * (xxx * xxx + yyy * yyy + 2.0 * pc[Z] * pc[Z]) / (2.0 * pc[Z]);

            let res_real = amplitude * p.sin() / (wavelength * pc[Z]);
            let res_imag = -amplitude * p.cos() / (wavelength * pc[Z]);
            data[xxtr + yytr * pn[X]] += Complex64::new(res_real, res_imag);
        }
    }
}
