//! AVX2 square root, reciprocal square root and reciprocal for f32
//!
//! `rsqrt` and `recip` divide instead of using `_mm256_rsqrt_ps` /
//! `_mm256_rcp_ps`: the approximations carry ~12 bits and miss the 1e-4
//! convergence tolerance for values far from 1.

use super::LANES;
use std::arch::x86_64::*;

#[target_feature(enable = "avx2")]
pub unsafe fn sqrt_f32(data: &mut [f32]) {
    let n = data.len();
    let chunks = n / LANES;
    let ptr = data.as_mut_ptr();

    for i in 0..chunks {
        let p = ptr.add(i * LANES);
        _mm256_storeu_ps(p, _mm256_sqrt_ps(_mm256_loadu_ps(p)));
    }

    for x in &mut data[chunks * LANES..] {
        *x = x.sqrt();
    }
}

#[target_feature(enable = "avx2")]
pub unsafe fn rsqrt_f32(data: &mut [f32]) {
    let n = data.len();
    let chunks = n / LANES;
    let one = _mm256_set1_ps(1.0);
    let ptr = data.as_mut_ptr();

    for i in 0..chunks {
        let p = ptr.add(i * LANES);
        let root = _mm256_sqrt_ps(_mm256_loadu_ps(p));
        _mm256_storeu_ps(p, _mm256_div_ps(one, root));
    }

    for x in &mut data[chunks * LANES..] {
        *x = 1.0 / x.sqrt();
    }
}

#[target_feature(enable = "avx2")]
pub unsafe fn recip_f32(data: &mut [f32]) {
    let n = data.len();
    let chunks = n / LANES;
    let one = _mm256_set1_ps(1.0);
    let ptr = data.as_mut_ptr();

    for i in 0..chunks {
        let p = ptr.add(i * LANES);
        _mm256_storeu_ps(p, _mm256_div_ps(one, _mm256_loadu_ps(p)));
    }

    for x in &mut data[chunks * LANES..] {
        *x = 1.0 / *x;
    }
}
