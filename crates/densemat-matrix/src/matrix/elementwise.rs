//! In-place elementwise arithmetic, delegated to the vector kernel

use super::Matrix;
use crate::pow::PowKernel;
use densemat_core::{kernel, Error, Result, VectorKernel};

impl Matrix {
    /// Split into `(self, other)` stores after checking shapes agree
    fn binary_operands<'a>(
        &'a mut self,
        other: &'a Matrix,
        operation: &'static str,
    ) -> Result<(&'a mut [f32], &'a [f32])> {
        other.require_shape(operation, self.shape())?;
        Ok((self.as_mut_slice(), other.as_slice()))
    }

    /// `self = self * self_scale + other * scale`
    pub fn add(&mut self, other: &Matrix, scale: f32, self_scale: f32) -> Result<&mut Self> {
        let (data, other) = self.binary_operands(other, "add")?;
        let k = kernel();
        if self_scale != 1.0 {
            k.scale(data, self_scale);
        }
        k.scaled_add(data, other, scale);
        Ok(self)
    }

    /// `self += other`
    pub fn add_matrix(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.add(other, 1.0, 1.0)
    }

    /// Add `delta` to every element
    pub fn add_scalar(&mut self, delta: f32) -> &mut Self {
        kernel().add_scalar(self.as_mut_slice(), delta);
        self
    }

    /// `self -= other * scale`
    pub fn subtract(&mut self, other: &Matrix, scale: f32) -> Result<&mut Self> {
        let (data, other) = self.binary_operands(other, "subtract")?;
        kernel().scaled_add(data, other, -scale);
        Ok(self)
    }

    /// `self -= other`
    pub fn subtract_matrix(&mut self, other: &Matrix) -> Result<&mut Self> {
        self.subtract(other, 1.0)
    }

    /// Subtract `delta` from every element
    pub fn subtract_scalar(&mut self, delta: f32) -> &mut Self {
        kernel().add_scalar(self.as_mut_slice(), -delta);
        self
    }

    /// Multiply every element by `factor`
    pub fn scale(&mut self, factor: f32) -> &mut Self {
        kernel().scale(self.as_mut_slice(), factor);
        self
    }

    /// Raise every element to `exponent`
    ///
    /// 0.5, -0.5 and 2 use dedicated vector kernels, see [`PowKernel`].
    pub fn pow(&mut self, exponent: f32) -> &mut Self {
        PowKernel::select(exponent).apply(kernel(), self.as_mut_slice());
        self
    }

    /// Elementwise reciprocal; zeros become infinities
    pub fn inverse(&mut self) -> &mut Self {
        kernel().recip(self.as_mut_slice());
        self
    }

    /// Elementwise (Hadamard) product with `other`
    pub fn dot_product(&mut self, other: &Matrix) -> Result<&mut Self> {
        let (data, other) = self.binary_operands(other, "dot_product")?;
        kernel().mul(data, other);
        Ok(self)
    }

    /// Clamp every element into `[-threshold, threshold]`
    pub fn clipping(&mut self, threshold: f32) -> Result<&mut Self> {
        // Written so NaN is rejected too
        if !(threshold > 0.0) {
            return Err(Error::invalid_parameter(format!(
                "clip threshold must be positive, got {threshold}"
            )));
        }
        for x in self.as_mut_slice() {
            *x = x.clamp(-threshold, threshold);
        }
        Ok(self)
    }
}
