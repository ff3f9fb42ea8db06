//! AVX2 scale, scalar-add and multiply kernels for f32

use super::LANES;
use std::arch::x86_64::*;

/// `data[i] *= factor`
#[target_feature(enable = "avx2")]
pub unsafe fn scale_f32(data: &mut [f32], factor: f32) {
    let n = data.len();
    let chunks = n / LANES;
    let factor_vec = _mm256_set1_ps(factor);
    let ptr = data.as_mut_ptr();

    for i in 0..chunks {
        let p = ptr.add(i * LANES);
        _mm256_storeu_ps(p, _mm256_mul_ps(_mm256_loadu_ps(p), factor_vec));
    }

    for x in &mut data[chunks * LANES..] {
        *x *= factor;
    }
}

/// `dst[i] = src[i] * factor`
#[target_feature(enable = "avx2")]
pub unsafe fn scale_into_f32(src: &[f32], dst: &mut [f32], factor: f32) {
    let n = src.len().min(dst.len());
    let chunks = n / LANES;
    let factor_vec = _mm256_set1_ps(factor);
    let src_ptr = src.as_ptr();
    let dst_ptr = dst.as_mut_ptr();

    for i in 0..chunks {
        let offset = i * LANES;
        let v = _mm256_loadu_ps(src_ptr.add(offset));
        _mm256_storeu_ps(dst_ptr.add(offset), _mm256_mul_ps(v, factor_vec));
    }

    for i in chunks * LANES..n {
        dst[i] = src[i] * factor;
    }
}

/// `data[i] += delta`
#[target_feature(enable = "avx2")]
pub unsafe fn add_scalar_f32(data: &mut [f32], delta: f32) {
    let n = data.len();
    let chunks = n / LANES;
    let delta_vec = _mm256_set1_ps(delta);
    let ptr = data.as_mut_ptr();

    for i in 0..chunks {
        let p = ptr.add(i * LANES);
        _mm256_storeu_ps(p, _mm256_add_ps(_mm256_loadu_ps(p), delta_vec));
    }

    for x in &mut data[chunks * LANES..] {
        *x += delta;
    }
}

/// `data[i] *= other[i]`
#[target_feature(enable = "avx2")]
pub unsafe fn mul_f32(data: &mut [f32], other: &[f32]) {
    let n = data.len().min(other.len());
    let chunks = n / LANES;
    let ptr = data.as_mut_ptr();
    let other_ptr = other.as_ptr();

    for i in 0..chunks {
        let offset = i * LANES;
        let p = ptr.add(offset);
        let v = _mm256_mul_ps(_mm256_loadu_ps(p), _mm256_loadu_ps(other_ptr.add(offset)));
        _mm256_storeu_ps(p, v);
    }

    for i in chunks * LANES..n {
        data[i] *= other[i];
    }
}

/// `data[i] *= data[i]`
#[target_feature(enable = "avx2")]
pub unsafe fn square_f32(data: &mut [f32]) {
    let n = data.len();
    let chunks = n / LANES;
    let ptr = data.as_mut_ptr();

    for i in 0..chunks {
        let p = ptr.add(i * LANES);
        let v = _mm256_loadu_ps(p);
        _mm256_storeu_ps(p, _mm256_mul_ps(v, v));
    }

    for x in &mut data[chunks * LANES..] {
        *x *= *x;
    }
}
