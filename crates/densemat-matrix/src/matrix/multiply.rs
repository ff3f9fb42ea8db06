//! Dense matrix product as a sum of scaled row accumulations
//!
//! `result.row(i) += self[i][k] * other.row(k)` for every non-zero
//! `self[i][k]`, so each kernel call spans a full output row.

use super::Matrix;
use densemat_core::{kernel, Error, Result, Shape, VectorKernel};
use tracing::debug;

impl Matrix {
    /// `self * other` into a new matrix
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        let shape = Self::product_shape(self, other)?;
        debug!("multiply: allocating {shape} result");
        let mut result = self.sibling(shape);
        self.multiply_into(&mut result, other)?;
        Ok(result)
    }

    /// `self * other` written over `result`, which must be `x_len x other.y_len`
    pub fn multiply_into<'a>(&self, result: &'a mut Matrix, other: &Matrix) -> Result<&'a mut Matrix> {
        let shape = Self::product_shape(self, other)?;
        result.require_shape("multiply", shape)?;
        let lhs = self.require_store("multiply")?;
        let rhs = other.require_store("multiply")?;
        let out = result.require_store_mut("multiply")?;
        out.fill(0.0);

        let (inner, cols) = (self.y_len, other.y_len);
        if inner > 0 && cols > 0 {
            let k = kernel();
            for (lhs_row, out_row) in lhs.chunks_exact(inner).zip(out.chunks_exact_mut(cols)) {
                for (&a, rhs_row) in lhs_row.iter().zip(rhs.chunks_exact(cols)) {
                    if a == 0.0 {
                        continue;
                    }
                    k.scaled_add(out_row, rhs_row, a);
                }
            }
        }
        Ok(result)
    }

    fn product_shape(lhs: &Matrix, rhs: &Matrix) -> Result<Shape> {
        if lhs.y_len != rhs.x_len {
            return Err(Error::shape_mismatch(
                "multiply",
                Shape::new(lhs.y_len, rhs.y_len),
                rhs.shape(),
            ));
        }
        Ok(Shape::new(lhs.x_len, rhs.y_len))
    }
}
