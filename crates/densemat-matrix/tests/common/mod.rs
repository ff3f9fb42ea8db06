//! Shared utilities for integration tests

#![allow(dead_code)]

use densemat_matrix::Matrix;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use approx::assert_relative_eq;

/// Tolerance of the adjoint identities
pub const ADJOINT_EPSILON: f64 = 1e-4;

/// Install a test subscriber honouring `RUST_LOG`; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Gaussian matrix drawn from a fixed seed
pub fn random_matrix(x_len: usize, y_len: usize, seed: u64) -> Matrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut m = Matrix::new(x_len, y_len);
    m.random_init(&mut rng);
    m
}

/// Frobenius inner product `sum(a * b)` accumulated in f64
pub fn inner(a: &Matrix, b: &Matrix) -> f64 {
    assert_eq!(a.shape(), b.shape(), "inner product shape mismatch");
    a.as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| x as f64 * y as f64)
        .sum()
}

/// Textbook triple loop in f64
pub fn naive_multiply(a: &Matrix, b: &Matrix) -> Vec<f32> {
    let (n, k, m) = (a.x_len(), a.y_len(), b.y_len());
    let mut out = vec![0.0f32; n * m];
    for i in 0..n {
        for j in 0..m {
            let mut acc = 0.0f64;
            for t in 0..k {
                acc += a[(i, t)] as f64 * b[(t, j)] as f64;
            }
            out[i * m + j] = acc as f32;
        }
    }
    out
}
