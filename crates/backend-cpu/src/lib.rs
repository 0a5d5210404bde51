//! CPU transform backend built on rustfft.
//!
//! The 2D transform runs as a row pass, a transpose, a second row pass over
//! the former columns, and a transpose back, so both passes stream over
//! contiguous memory. Plans are cached per length inside the shared planner.

use std::sync::Mutex;

use cgh2d_core::backend::TransformBackend;
use cgh2d_core::field::{ComplexField, Dims};
use num_complex::Complex64;
use rustfft::{FftDirection, FftPlanner};

#[cfg(test)]
mod _tests_lib;

pub struct CpuBackend {
    planner: Mutex<FftPlanner<f64>>,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self {
            planner: Mutex::new(FftPlanner::new()),
        }
    }

    fn fft_2d(&self, dims: Dims, data: &mut [Complex64], direction: FftDirection) {
        let mut planner = self.planner.lock().expect("FFT planner lock poisoned");

        let row_fft = planner.plan_fft(dims.nx, direction);
        let mut scratch = vec![Complex64::default(); row_fft.get_inplace_scratch_len()];
        for row in data.chunks_exact_mut(dims.nx) {
            row_fft.process_with_scratch(row, &mut scratch);
        }

        let mut transposed = transpose(dims.nx, dims.ny, data);
        let col_fft = planner.plan_fft(dims.ny, direction);
        scratch.resize(col_fft.get_inplace_scratch_len(), Complex64::default());
        for column in transposed.chunks_exact_mut(dims.ny) {
            col_fft.process_with_scratch(column, &mut scratch);
        }

        let restored = transpose(dims.ny, dims.nx, &transposed);
        data.copy_from_slice(&restored);
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformBackend for CpuBackend {
    type Buffer = ComplexField;

    fn alloc_field(&self, dims: Dims) -> Self::Buffer {
        ComplexField::zeros(dims)
    }

    fn forward_fft_2d(&self, buffer: &mut Self::Buffer) {
        let dims = buffer.dims();
        self.fft_2d(dims, buffer.as_mut_slice(), FftDirection::Forward);
    }

    fn inverse_fft_2d(&self, buffer: &mut Self::Buffer) {
        let dims = buffer.dims();
        self.fft_2d(dims, buffer.as_mut_slice(), FftDirection::Inverse);
        let norm = 1.0 / dims.len() as f64;
        for value in buffer.as_mut_slice() {
            *value *= norm;
        }
    }

    fn shift_quadrants(&self, buffer: &mut Self::Buffer) {
        let dims = buffer.dims();
        let data = buffer.as_mut_slice();
        let mut shifted = vec![Complex64::default(); data.len()];
        for iy in 0..dims.ny {
            let sy = (iy + dims.ny / 2) % dims.ny;
            for ix in 0..dims.nx {
                let sx = (ix + dims.nx / 2) % dims.nx;
                shifted[sy * dims.nx + sx] = data[iy * dims.nx + ix];
            }
        }
        data.copy_from_slice(&shifted);
    }
}

fn transpose(width: usize, height: usize, matrix: &[Complex64]) -> Vec<Complex64> {
    let mut transposed = vec![Complex64::default(); matrix.len()];
    for row in 0..height {
        for col in 0..width {
            transposed[col * height + row] = matrix[row * width + col];
        }
    }
    transposed
}
