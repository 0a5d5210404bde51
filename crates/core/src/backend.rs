//! Backend traits for the 2D transform primitive.
//!
//! The diffraction core consumes Fourier transforms and quadrant shifts
//! through these traits; `cgh2d-backend-cpu` provides the rustfft
//! implementation and a GPU backend would be an alternate implementation of
//! the same contract.

use num_complex::Complex64;

use crate::field::{ComplexField, Dims};

pub trait TransformBuffer {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn dims(&self) -> Dims;
    fn as_slice(&self) -> &[Complex64];
    fn as_mut_slice(&mut self) -> &mut [Complex64];
}

impl TransformBuffer for ComplexField {
    fn len(&self) -> usize {
        self.len()
    }

    fn dims(&self) -> Dims {
        self.dims()
    }

    fn as_slice(&self) -> &[Complex64] {
        self.as_slice()
    }

    fn as_mut_slice(&mut self) -> &mut [Complex64] {
        self.as_mut_slice()
    }
}

pub trait TransformBackend {
    type Buffer: TransformBuffer + Clone;

    /// Allocate a zero-initialized complex buffer.
    fn alloc_field(&self, dims: Dims) -> Self::Buffer;

    /// Unnormalized forward 2D DFT, in place.
    fn forward_fft_2d(&self, buffer: &mut Self::Buffer);

    /// Inverse 2D DFT, in place, normalized by 1/(nx*ny) so that
    /// forward followed by inverse is the identity up to roundoff.
    fn inverse_fft_2d(&self, buffer: &mut Self::Buffer);

    /// Quadrant shift (DC sample moved to the buffer center), in place.
    ///
    /// For even dimensions this is an involution and serves as both the
    /// forward and inverse shift; every runtime grid here is even-sized.
    fn shift_quadrants(&self, buffer: &mut Self::Buffer);
}
