//! Shared utilities for integration tests

#![allow(dead_code)]

pub use approx::assert_relative_eq;

pub const EPSILON: f32 = 1e-5;

/// Generate array lengths that test edge cases for SIMD operations
pub fn edge_case_lengths() -> Vec<usize> {
    vec![
        0,   // Empty
        1,   // Single element
        3,   // Below one lane group
        7,   // AVX2 width - 1
        8,   // AVX2 width
        9,   // AVX2 width + 1
        15,  // Multiple of no SIMD width
        16,  // Two lane groups
        17,  // Two lane groups + 1
        31,  // Prime
        64,  // Cache line
        100, // Round number
        127, // Mersenne prime
    ]
}

/// Assert two vectors are equal within a relative tolerance
pub fn assert_vectors_equal(actual: &[f32], expected: &[f32], op: &str) {
    assert_eq!(actual.len(), expected.len(), "{op} length mismatch");

    for (&a, &e) in actual.iter().zip(expected.iter()) {
        assert_relative_eq!(a, e, epsilon = EPSILON, max_relative = EPSILON);
    }
}

/// Generate strictly positive test data with specific patterns
pub fn generate_test_data(len: usize) -> Vec<f32> {
    (0..len).map(|i| i as f32 * 0.25 + 0.1).collect()
}

/// Generate complementary test data for binary operations
pub fn generate_test_data_complement(len: usize) -> Vec<f32> {
    (0..len).map(|i| (len - i) as f32 * 0.5 - 3.0).collect()
}
