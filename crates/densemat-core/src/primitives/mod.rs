//! Vector math kernels with runtime backend selection
//!
//! # Architecture
//!
//! - Single [`VectorKernel`] trait over contiguous `f32` spans
//! - Concrete backend types: [`ScalarBackend`], [`Avx2Backend`]
//! - [`AutoBackend`] chosen once from CPU feature detection
//!
//! # Usage
//!
//! ```rust
//! use densemat_core::{kernel, VectorKernel};
//!
//! let mut data = vec![1.0f32, 4.0, 9.0];
//! kernel().sqrt(&mut data);
//! assert_eq!(data, vec![1.0, 2.0, 3.0]);
//! ```

pub mod backends;
pub mod traits;

pub use backends::{kernel, AutoBackend, Avx2Backend, ScalarBackend};
pub use traits::VectorKernel;

/// Create a scalar backend (always available)
pub fn scalar_backend() -> ScalarBackend {
    ScalarBackend::new()
}

/// Create an AVX2 backend (panics if not supported)
#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
pub fn avx2_backend() -> Avx2Backend {
    Avx2Backend::new()
}

/// Get the best available backend name
pub fn best_backend_name() -> &'static str {
    #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
    {
        if Avx2Backend::is_available() {
            return "avx2";
        }
    }
    "scalar"
}
