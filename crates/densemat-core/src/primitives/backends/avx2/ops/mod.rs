//! Operation-centric modules for AVX2 vector kernels
//!
//! Each operation is organized in its own module

pub mod dot_product;
pub mod elementwise;
pub mod scaled_add;
pub mod unary;

/// `f32` lanes per `__m256`
pub(crate) const LANES: usize = 8;
