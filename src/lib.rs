//! # densemat
//!
//! Dense single-precision matrices for small convolutional networks.
//!
//! This crate re-exports the workspace crates:
//!
//! - [`core`] (`densemat-core`) - vector kernels, pooled buffers, errors
//! - [`matrix`] (`densemat-matrix`) - [`Matrix`], convolution and its adjoints
//!
//! ## Quick Start
//!
//! ```rust
//! use densemat::prelude::*;
//!
//! # fn main() -> densemat::Result<()> {
//! let input = Matrix::from_row_major(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0])?;
//! let mut filter = Matrix::new(2, 2);
//! filter.random_init_seeded(42);
//!
//! let params = ConvParams::default().with_padding(1);
//! let output = input.convolution(&filter, params)?;
//! assert_eq!(output.shape(), Shape::new(4, 4));
//!
//! // Backpropagate a unit gradient
//! let mut grad = Matrix::with_shape(output.shape());
//! grad.add_scalar(1.0);
//! let mut filter_grad = Matrix::with_shape(filter.shape());
//! grad.deconvolution_to_filter_gradient(&mut filter_grad, &input, params)?;
//! filter.subtract(&filter_grad, 0.01)?;
//! # Ok(())
//! # }
//! ```

pub use densemat_core as core;
pub use densemat_matrix as matrix;

pub use densemat_core::{Error, Result, Shape};
pub use densemat_matrix::{ConvParams, Matrix, MatrixCollection};

/// Common imports
pub mod prelude {
    pub use densemat_core::kernel;
    pub use densemat_matrix::prelude::*;
}
