//! Core kernels and storage for dense single-precision matrices
//!
//! This crate provides the leaf components the matrix layer is built on:
//!
//! 1. **Primitives** - a [`VectorKernel`] trait over contiguous `f32` spans,
//!    with scalar and AVX2 backends chosen once at runtime
//! 2. **Workspace** - aligned buffers recycled through a [`BufferPool`]
//! 3. **Random** - a [`GaussianSource`] for weight initialization
//!
//! # Example
//!
//! ```rust
//! use densemat_core::{global_pool, kernel, VectorKernel};
//!
//! let mut store = global_pool().checkout(4);
//! store.copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
//! kernel().scale(&mut store, 0.5);
//! assert_eq!(&store[..], &[0.5, 1.0, 1.5, 2.0]);
//! ```

pub mod error;
pub mod primitives;
pub mod random;
pub mod shape;
pub mod workspace;

pub use error::{Error, Result};
pub use primitives::{
    best_backend_name, kernel, scalar_backend, AutoBackend, Avx2Backend, ScalarBackend,
    VectorKernel,
};
pub use random::GaussianSource;
pub use shape::Shape;
pub use workspace::{global_pool, AlignedBuffer, BufferPool, PoolConfig, PooledBuffer};

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub use primitives::avx2_backend;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Absolute per-element tolerance of the numerical-equality oracle
pub const CONVERGENCE_EPSILON: f32 = 1e-4;
