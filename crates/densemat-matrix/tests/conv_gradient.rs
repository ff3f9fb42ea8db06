//! The backward operators must be exact adjoints of forward convolution:
//!
//! `<conv(X, W), G> == <X, dX(G, W)> == <W, dW(G, X)>`
//!
//! Cases are picked so `(n - f + 2p)` divides by the stride and the recovered
//! input extent equals the real one.

mod common;

use common::*;
use densemat_core::{Error, Shape};
use densemat_matrix::{ConvGeometry, ConvParams, Matrix};

struct Case {
    input: (usize, usize),
    filter: (usize, usize),
    padding: usize,
    stride: usize,
}

const CASES: &[Case] = &[
    Case { input: (5, 5), filter: (3, 3), padding: 0, stride: 1 },
    Case { input: (6, 7), filter: (2, 3), padding: 1, stride: 1 },
    Case { input: (7, 9), filter: (3, 5), padding: 1, stride: 2 },
    Case { input: (5, 7), filter: (3, 2), padding: 2, stride: 3 },
    Case { input: (1, 6), filter: (1, 2), padding: 0, stride: 2 },
    Case { input: (4, 4), filter: (4, 4), padding: 2, stride: 1 },
];

fn adjoint_tolerance(reference: f64) -> f64 {
    ADJOINT_EPSILON * reference.abs().max(1.0)
}

#[test]
fn test_identity_filter_scenario() {
    init_tracing();
    let input = Matrix::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
    let filter = Matrix::from_row_major(2, 2, &[1.0, 0.0, 0.0, 1.0]).unwrap();
    let out = input.convolution(&filter, ConvParams::default()).unwrap();
    assert_eq!(out.shape(), Shape::new(1, 1));
    assert_eq!(out.get(0, 0).unwrap(), 5.0);
}

#[test]
fn test_output_shape_formula() {
    for case in CASES {
        let input = random_matrix(case.input.0, case.input.1, 1);
        let filter = random_matrix(case.filter.0, case.filter.1, 2);
        let params = ConvParams::new(case.padding, case.stride);
        let out = input.convolution(&filter, params).unwrap();

        let expected = Shape::new(
            (case.input.0 - case.filter.0 + 2 * case.padding) / case.stride + 1,
            (case.input.1 - case.filter.1 + 2 * case.padding) / case.stride + 1,
        );
        assert_eq!(out.shape(), expected);
        assert_eq!(
            ConvGeometry::recovered_shape(out.shape(), filter.shape(), params).unwrap(),
            input.shape()
        );
    }
}

#[test]
fn test_input_gradient_is_adjoint() {
    init_tracing();
    for (n, case) in CASES.iter().enumerate() {
        let seed = 100 * n as u64;
        let params = ConvParams::new(case.padding, case.stride);
        let x = random_matrix(case.input.0, case.input.1, seed);
        let w = random_matrix(case.filter.0, case.filter.1, seed + 1);
        let y = x.convolution(&w, params).unwrap();
        let g = random_matrix(y.x_len(), y.y_len(), seed + 2);

        let dx = g.deconvolution_to_input_gradient(&w, params).unwrap();
        assert_eq!(dx.shape(), x.shape());

        let lhs = inner(&y, &g);
        let rhs = inner(&x, &dx);
        assert!(
            (lhs - rhs).abs() <= adjoint_tolerance(lhs),
            "case {n}: <conv(X, W), G> = {lhs}, <X, dX> = {rhs}"
        );
    }
}

#[test]
fn test_filter_gradient_is_adjoint() {
    for (n, case) in CASES.iter().enumerate() {
        let seed = 100 * n as u64 + 50;
        let params = ConvParams::new(case.padding, case.stride);
        let x = random_matrix(case.input.0, case.input.1, seed);
        let w = random_matrix(case.filter.0, case.filter.1, seed + 1);
        let y = x.convolution(&w, params).unwrap();
        let g = random_matrix(y.x_len(), y.y_len(), seed + 2);

        let mut dw = Matrix::with_shape(w.shape());
        g.deconvolution_to_filter_gradient(&mut dw, &x, params)
            .unwrap();

        let lhs = inner(&y, &g);
        let rhs = inner(&w, &dw);
        assert!(
            (lhs - rhs).abs() <= adjoint_tolerance(lhs),
            "case {n}: <conv(X, W), G> = {lhs}, <W, dW> = {rhs}"
        );
    }
}

#[test]
fn test_filter_gradient_accumulates_across_calls() {
    let params = ConvParams::new(1, 1);
    let x = random_matrix(4, 5, 7);
    let g = random_matrix(4, 5, 8);

    let mut once = Matrix::new(3, 3);
    g.deconvolution_to_filter_gradient(&mut once, &x, params).unwrap();

    let mut twice = Matrix::new(3, 3);
    g.deconvolution_to_filter_gradient(&mut twice, &x, params).unwrap();
    g.deconvolution_to_filter_gradient(&mut twice, &x, params).unwrap();

    once.scale(2.0);
    assert!(once.check_convergence(&twice).unwrap());
}

#[test]
fn test_gradient_of_identity_filter_routes_values() {
    // With a 1x1 unit filter the input gradient is the output gradient
    let g = random_matrix(3, 4, 9);
    let unit = Matrix::from_row_major(1, 1, &[1.0]).unwrap();
    let dx = g
        .deconvolution_to_input_gradient(&unit, ConvParams::default())
        .unwrap();
    assert_eq!(dx, g);
}

#[test]
fn test_invalid_parameters() {
    let x = Matrix::new(3, 3);
    let w = Matrix::new(2, 2);
    assert!(matches!(
        x.convolution(&w, ConvParams::new(0, 0)),
        Err(Error::InvalidParameter(_))
    ));

    let g = Matrix::new(1, 1);
    assert!(matches!(
        g.deconvolution_to_input_gradient(&w, ConvParams::new(2, 1)),
        Err(Error::InvalidParameter(_))
    ));

    let mut dw = Matrix::new(2, 2);
    assert!(g
        .deconvolution_to_filter_gradient(&mut dw, &x, ConvParams::new(0, 0))
        .is_err());
}
