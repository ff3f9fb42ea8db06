//! Benchmarks for convolution, its adjoints and the matrix product

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use densemat_matrix::{ConvParams, Matrix};

fn seeded(x_len: usize, y_len: usize, seed: u64) -> Matrix {
    let mut m = Matrix::new(x_len, y_len);
    m.random_init_seeded(seed);
    m
}

/// Forward and backward passes of a single-channel conv layer
fn bench_convolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolution");
    let params = ConvParams::default().with_padding(1);

    for &(size, filter) in &[(28, 3), (28, 5), (64, 3)] {
        let input = seeded(size, size, 1);
        let weights = seeded(filter, filter, 2);
        let output = input.convolution(&weights, params).unwrap();
        let grad = seeded(output.x_len(), output.y_len(), 3);
        let id = format!("{size}x{size}/{filter}x{filter}");

        group.bench_with_input(BenchmarkId::new("forward", &id), &input, |b, input| {
            b.iter(|| black_box(input.convolution(&weights, params).unwrap()));
        });

        let mut result = Matrix::with_shape(output.shape());
        group.bench_with_input(BenchmarkId::new("forward_into", &id), &input, |b, input| {
            b.iter(|| {
                input
                    .convolution_into(black_box(&mut result), &weights, params)
                    .unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("input_gradient", &id), &grad, |b, grad| {
            b.iter(|| black_box(grad.deconvolution_to_input_gradient(&weights, params).unwrap()));
        });

        let mut dw = Matrix::with_shape(weights.shape());
        group.bench_with_input(BenchmarkId::new("filter_gradient", &id), &grad, |b, grad| {
            b.iter(|| {
                grad.deconvolution_to_filter_gradient(black_box(&mut dw), &input, params)
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply");

    for &size in &[16, 64, 256] {
        let a = seeded(size, size, 4);
        let b = seeded(size, size, 5);
        let mut result = Matrix::new(size, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &a, |bench, a| {
            bench.iter(|| {
                a.multiply_into(black_box(&mut result), &b).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_convolution, bench_multiply);
criterion_main!(benches);
