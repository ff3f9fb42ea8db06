//! Shared utilities for AVX2 implementations

use std::arch::x86_64::*;

/// Horizontal sum of a __m256 (8 f32s)
#[inline]
#[target_feature(enable = "avx2")]
pub unsafe fn horizontal_sum_ps(v: __m256) -> f32 {
    // Extract high and low 128-bit lanes
    let high = _mm256_extractf128_ps(v, 1);
    let low = _mm256_castps256_ps128(v);

    // Add high and low
    let sum128 = _mm_add_ps(high, low);

    // Horizontal add within 128-bit lane (two steps)
    let shuf = _mm_movehdup_ps(sum128);
    let sums = _mm_add_ps(sum128, shuf);
    let shuf = _mm_movehl_ps(shuf, sums);
    let result = _mm_add_ss(sums, shuf);

    _mm_cvtss_f32(result)
}
