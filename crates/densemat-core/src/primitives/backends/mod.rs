//! Backend implementations and runtime selection
//!
//! Concrete backend types with direct implementations, plus [`AutoBackend`]
//! which picks the best one once per process.

pub mod avx2;
pub mod scalar;

pub use avx2::Avx2Backend;
pub use scalar::ScalarBackend;

use super::VectorKernel;
use lazy_static::lazy_static;

/// The best backend detected on this CPU
#[derive(Clone, Copy, Debug)]
pub enum AutoBackend {
    Scalar(ScalarBackend),
    Avx2(Avx2Backend),
}

impl AutoBackend {
    /// Probe the CPU and pick the widest available backend
    pub fn detect() -> Self {
        if Avx2Backend::is_available() {
            AutoBackend::Avx2(Avx2Backend::new())
        } else {
            AutoBackend::Scalar(ScalarBackend::new())
        }
    }
}

macro_rules! delegate {
    ($self:ident, $k:ident => $call:expr) => {
        match $self {
            AutoBackend::Scalar($k) => $call,
            AutoBackend::Avx2($k) => $call,
        }
    };
}

impl VectorKernel for AutoBackend {
    fn backend_name(&self) -> &'static str {
        delegate!(self, k => k.backend_name())
    }

    fn simd_width(&self) -> usize {
        delegate!(self, k => k.simd_width())
    }

    #[inline]
    fn scale(&self, data: &mut [f32], factor: f32) {
        delegate!(self, k => k.scale(data, factor))
    }

    #[inline]
    fn scale_into(&self, src: &[f32], dst: &mut [f32], factor: f32) {
        delegate!(self, k => k.scale_into(src, dst, factor))
    }

    #[inline]
    fn scaled_add(&self, acc: &mut [f32], other: &[f32], scale: f32) {
        delegate!(self, k => k.scaled_add(acc, other, scale))
    }

    #[inline]
    fn add_scalar(&self, data: &mut [f32], delta: f32) {
        delegate!(self, k => k.add_scalar(data, delta))
    }

    #[inline]
    fn mul(&self, data: &mut [f32], other: &[f32]) {
        delegate!(self, k => k.mul(data, other))
    }

    #[inline]
    fn square(&self, data: &mut [f32]) {
        delegate!(self, k => k.square(data))
    }

    #[inline]
    fn sqrt(&self, data: &mut [f32]) {
        delegate!(self, k => k.sqrt(data))
    }

    #[inline]
    fn rsqrt(&self, data: &mut [f32]) {
        delegate!(self, k => k.rsqrt(data))
    }

    #[inline]
    fn recip(&self, data: &mut [f32]) {
        delegate!(self, k => k.recip(data))
    }

    #[inline]
    fn dot_product(&self, a: &[f32], b: &[f32]) -> f32 {
        delegate!(self, k => k.dot_product(a, b))
    }
}

lazy_static! {
    static ref ACTIVE: AutoBackend = {
        let backend = AutoBackend::detect();
        log::debug!(
            "densemat vector kernel: {} (width {})",
            backend.backend_name(),
            backend.simd_width()
        );
        backend
    };
}

/// The process-wide kernel used by matrix operations
#[inline]
pub fn kernel() -> &'static AutoBackend {
    &ACTIVE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_is_stable() {
        let a = kernel().backend_name();
        let b = kernel().backend_name();
        assert_eq!(a, b);
        assert!(a == "scalar" || a == "avx2");
    }

    #[test]
    fn test_auto_backend_delegates() {
        let backend = AutoBackend::Scalar(ScalarBackend::new());
        assert_eq!(backend.backend_name(), "scalar");
        assert_eq!(backend.simd_width(), 1);

        let mut data = vec![1.0, 2.0];
        backend.scale(&mut data, 3.0);
        assert_eq!(data, vec![3.0, 6.0]);
    }
}
