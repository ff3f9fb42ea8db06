//! Scalar backend implementation
//!
//! This backend uses the portable default implementations of
//! [`VectorKernel`] without any SIMD instructions.

use crate::primitives::VectorKernel;

/// Scalar backend - always available
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarBackend;

impl ScalarBackend {
    pub fn new() -> Self {
        Self
    }
}

impl VectorKernel for ScalarBackend {
    fn backend_name(&self) -> &'static str {
        "scalar"
    }

    // All operations use the default implementations from the trait
}
