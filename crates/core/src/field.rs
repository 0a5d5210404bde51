//! Contiguous complex-valued field storage on a uniform 2D pixel grid.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of a complex field buffer.
///
/// Physical quantities (pitch, sensor size) live in
/// [`OpticalContext`](crate::context::OpticalContext); a buffer only knows
/// its sample counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dims {
    pub nx: usize,
    pub ny: usize,
}

impl Dims {
    pub fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny }
    }

    #[inline]
    pub fn idx(&self, ix: usize, iy: usize) -> usize {
        iy * self.nx + ix
    }

    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A wavefront sampled at a plane: one complex amplitude per pixel,
/// row-major over (x, y).
#[derive(Debug, Clone)]
pub struct ComplexField {
    dims: Dims,
    data: Vec<Complex64>,
}

impl ComplexField {
    /// Fully zero-initialized field, ready for kernel accumulation.
    pub fn zeros(dims: Dims) -> Self {
        Self {
            data: vec![Complex64::default(); dims.len()],
            dims,
        }
    }

    pub fn from_vec(dims: Dims, data: Vec<Complex64>) -> Self {
        assert_eq!(data.len(), dims.len(), "data length must match field dimensions");
        Self { dims, data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn idx(&self, ix: usize, iy: usize) -> usize {
        self.dims.idx(ix, iy)
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [Complex64] {
        &mut self.data
    }

    pub fn get(&self, ix: usize, iy: usize) -> &Complex64 {
        let idx = self.idx(ix, iy);
        &self.data[idx]
    }

    pub fn get_mut(&mut self, ix: usize, iy: usize) -> &mut Complex64 {
        let idx = self.idx(ix, iy);
        &mut self.data[idx]
    }

    pub fn fill(&mut self, value: Complex64) {
        self.data.fill(value);
    }

    /// Element-wise sum, used when merging per-worker accumulation buffers.
    pub fn add_assign(&mut self, other: &ComplexField) {
        assert_eq!(self.dims, other.dims, "field dimensions must match");
        for (dst, src) in self.data.iter_mut().zip(other.data.iter()) {
            *dst += src;
        }
    }
}

impl From<ComplexField> for Vec<Complex64> {
    fn from(field: ComplexField) -> Self {
        field.data
    }
}
