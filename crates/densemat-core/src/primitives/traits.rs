//! Vector math kernel trait
//!
//! Elementwise operations over contiguous `f32` spans. Every method has a
//! portable default so a backend only overrides what it can vectorize.

/// Fixed-contract vector math kernel
///
/// All operations work in place over the full slice unless stated otherwise.
/// Binary operations require equal lengths; this is checked with
/// `debug_assert!` only, callers validate shapes at the API boundary.
pub trait VectorKernel: Clone + Send + Sync {
    /// Get the name of this backend
    fn backend_name(&self) -> &'static str;

    /// Get the SIMD width (number of elements processed in parallel)
    fn simd_width(&self) -> usize {
        1
    }

    /// `data[i] *= factor`
    fn scale(&self, data: &mut [f32], factor: f32) {
        for x in data.iter_mut() {
            *x *= factor;
        }
    }

    /// `dst[i] = src[i] * factor`
    fn scale_into(&self, src: &[f32], dst: &mut [f32], factor: f32) {
        debug_assert_eq!(src.len(), dst.len(), "scale_into length mismatch");
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = s * factor;
        }
    }

    /// `acc[i] += other[i] * scale`
    fn scaled_add(&self, acc: &mut [f32], other: &[f32], scale: f32) {
        debug_assert_eq!(acc.len(), other.len(), "scaled_add length mismatch");
        for (a, &b) in acc.iter_mut().zip(other) {
            *a += b * scale;
        }
    }

    /// `data[i] += delta`
    fn add_scalar(&self, data: &mut [f32], delta: f32) {
        for x in data.iter_mut() {
            *x += delta;
        }
    }

    /// `data[i] *= other[i]`
    fn mul(&self, data: &mut [f32], other: &[f32]) {
        debug_assert_eq!(data.len(), other.len(), "mul length mismatch");
        for (a, &b) in data.iter_mut().zip(other) {
            *a *= b;
        }
    }

    /// `data[i] *= data[i]`
    fn square(&self, data: &mut [f32]) {
        for x in data.iter_mut() {
            *x *= *x;
        }
    }

    /// `data[i] = sqrt(data[i])`
    fn sqrt(&self, data: &mut [f32]) {
        for x in data.iter_mut() {
            *x = x.sqrt();
        }
    }

    /// `data[i] = 1 / sqrt(data[i])`
    fn rsqrt(&self, data: &mut [f32]) {
        for x in data.iter_mut() {
            *x = 1.0 / x.sqrt();
        }
    }

    /// `data[i] = 1 / data[i]`
    fn recip(&self, data: &mut [f32]) {
        for x in data.iter_mut() {
            *x = 1.0 / *x;
        }
    }

    /// Compute dot product of two vectors
    fn dot_product(&self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "dot_product length mismatch");
        a.iter().zip(b).map(|(&x, &y)| x * y).sum()
    }
}
