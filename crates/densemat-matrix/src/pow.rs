//! Exponent dispatch for [`Matrix::pow`](crate::Matrix::pow)
//!
//! A few exponents show up constantly in optimizer updates (square roots of
//! second moments, their reciprocals, squared gradients) and have dedicated
//! vector kernels. Everything else goes through `powf`.

use densemat_core::VectorKernel;

/// Kernel chosen for an exponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowKernel {
    /// `x^0.5`
    Sqrt,
    /// `x^-0.5`
    Rsqrt,
    /// `x^2`
    Square,
    /// `x^e` elementwise
    Generic(f32),
}

const TABLE: [(f32, PowKernel); 3] = [
    (0.5, PowKernel::Sqrt),
    (-0.5, PowKernel::Rsqrt),
    (2.0, PowKernel::Square),
];

impl PowKernel {
    /// Pick the kernel for `exponent`; only exact matches are special-cased
    pub fn select(exponent: f32) -> Self {
        TABLE
            .iter()
            .find(|(e, _)| *e == exponent)
            .map(|&(_, kernel)| kernel)
            .unwrap_or(PowKernel::Generic(exponent))
    }

    /// Raise every element of `data` to this kernel's exponent
    pub fn apply<K: VectorKernel>(self, backend: &K, data: &mut [f32]) {
        match self {
            PowKernel::Sqrt => backend.sqrt(data),
            PowKernel::Rsqrt => backend.rsqrt(data),
            PowKernel::Square => backend.square(data),
            PowKernel::Generic(exponent) => {
                for x in data.iter_mut() {
                    *x = x.powf(exponent);
                }
            }
        }
    }
}
