//! Dense 2D matrices for small neural-network layers
//!
//! [`Matrix`] is a row-major `f32` matrix whose store is checked out of a
//! [`densemat_core::BufferPool`]. Elementwise arithmetic goes through the
//! runtime-selected [`densemat_core::VectorKernel`]; on top of that sit the
//! matrix product and the three convolution operators a convolutional layer
//! needs:
//!
//! - [`Matrix::convolution`] - forward cross-correlation with padding/stride
//! - [`Matrix::deconvolution_to_input_gradient`] - gradient w.r.t. the input
//! - [`Matrix::deconvolution_to_filter_gradient`] - gradient w.r.t. the filter
//!
//! # Example
//!
//! ```rust
//! use densemat_matrix::{ConvParams, Matrix};
//!
//! # fn main() -> densemat_core::Result<()> {
//! let input = Matrix::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0])?;
//! let filter = Matrix::identity(2);
//! let out = input.convolution(&filter, ConvParams::default())?;
//! assert_eq!(out.as_slice(), &[5.0]);
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod conv;
pub mod matrix;
pub mod pow;

pub use collection::MatrixCollection;
pub use conv::{ConvGeometry, ConvParams};
pub use matrix::Matrix;
pub use pow::PowKernel;

/// Common imports
pub mod prelude {
    pub use crate::{ConvParams, Matrix, MatrixCollection};
    pub use densemat_core::{Error, Result, Shape, VectorKernel};
}
