//! AVX2 backend implementation with operation-centric organization
//!
//! Each kernel lives in its own module under `ops` and processes 8 `f32`
//! lanes per iteration with a scalar tail for the remainder.

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
mod ops;
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
mod utils;

use crate::primitives::VectorKernel;

/// AVX2 backend for x86_64 processors
#[derive(Clone, Copy, Debug)]
pub struct Avx2Backend;

impl Avx2Backend {
    /// Create a new AVX2 backend
    ///
    /// # Panics
    /// Panics if the CPU doesn't support AVX2 and FMA instructions
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
        {
            if !Self::is_available() {
                panic!("AVX2 backend requested but CPU doesn't support AVX2/FMA instructions");
            }
            Self
        }
        #[cfg(not(all(target_arch = "x86_64", feature = "avx2")))]
        {
            panic!("AVX2 backend not available: not compiled with AVX2 support");
        }
    }

    /// Check if AVX2 and FMA are available on this CPU
    pub fn is_available() -> bool {
        #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
        {
            is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma")
        }
        #[cfg(not(all(target_arch = "x86_64", feature = "avx2")))]
        {
            false
        }
    }
}

// Safety for every call below: `new()` verified CPU support.
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
impl VectorKernel for Avx2Backend {
    fn backend_name(&self) -> &'static str {
        "avx2"
    }

    fn simd_width(&self) -> usize {
        8
    }

    fn scale(&self, data: &mut [f32], factor: f32) {
        unsafe { ops::elementwise::scale_f32(data, factor) }
    }

    fn scale_into(&self, src: &[f32], dst: &mut [f32], factor: f32) {
        debug_assert_eq!(src.len(), dst.len(), "scale_into length mismatch");
        unsafe { ops::elementwise::scale_into_f32(src, dst, factor) }
    }

    fn scaled_add(&self, acc: &mut [f32], other: &[f32], scale: f32) {
        debug_assert_eq!(acc.len(), other.len(), "scaled_add length mismatch");
        unsafe { ops::scaled_add::scaled_add_f32(acc, other, scale) }
    }

    fn add_scalar(&self, data: &mut [f32], delta: f32) {
        unsafe { ops::elementwise::add_scalar_f32(data, delta) }
    }

    fn mul(&self, data: &mut [f32], other: &[f32]) {
        debug_assert_eq!(data.len(), other.len(), "mul length mismatch");
        unsafe { ops::elementwise::mul_f32(data, other) }
    }

    fn square(&self, data: &mut [f32]) {
        unsafe { ops::elementwise::square_f32(data) }
    }

    fn sqrt(&self, data: &mut [f32]) {
        unsafe { ops::unary::sqrt_f32(data) }
    }

    fn rsqrt(&self, data: &mut [f32]) {
        unsafe { ops::unary::rsqrt_f32(data) }
    }

    fn recip(&self, data: &mut [f32]) {
        unsafe { ops::unary::recip_f32(data) }
    }

    fn dot_product(&self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "dot_product length mismatch");
        unsafe { ops::dot_product::dot_product_f32(a, b) }
    }
}

// Fallback for non-AVX2 builds
#[cfg(not(all(target_arch = "x86_64", feature = "avx2")))]
impl VectorKernel for Avx2Backend {
    fn backend_name(&self) -> &'static str {
        "avx2 (unavailable)"
    }
}
