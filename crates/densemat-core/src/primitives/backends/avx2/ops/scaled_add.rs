//! AVX2 scaled accumulate for f32
//!
//! `acc[i] += other[i] * scale`, the row update used by matrix multiply and
//! the filter-gradient accumulation.

use super::LANES;
use std::arch::x86_64::*;

#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn scaled_add_f32(acc: &mut [f32], other: &[f32], scale: f32) {
    let n = acc.len().min(other.len());
    let chunks = n / LANES;
    let scale_vec = _mm256_set1_ps(scale);
    let acc_ptr = acc.as_mut_ptr();
    let other_ptr = other.as_ptr();

    // Main loop - process 8 elements at a time
    for i in 0..chunks {
        let offset = i * LANES;
        let a = acc_ptr.add(offset);
        let b = _mm256_loadu_ps(other_ptr.add(offset));
        _mm256_storeu_ps(a, _mm256_fmadd_ps(b, scale_vec, _mm256_loadu_ps(a)));
    }

    for i in chunks * LANES..n {
        acc[i] += other[i] * scale;
    }
}
