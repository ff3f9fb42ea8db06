//! Adjoints of [`Matrix::convolution`]
//!
//! `self` is always the gradient with respect to the convolution output.

use super::{ConvGeometry, ConvParams};
use crate::Matrix;
use densemat_core::{kernel, Result, VectorKernel};
use tracing::{debug, instrument};

impl Matrix {
    /// Gradient with respect to the convolution input
    ///
    /// The input extent is recovered as `(o - 1) * s + f - 2p` per axis. When
    /// the forward division was inexact the trailing rows/columns it dropped
    /// are not recovered.
    pub fn deconvolution_to_input_gradient(
        &self,
        filter: &Matrix,
        params: ConvParams,
    ) -> Result<Matrix> {
        let shape = ConvGeometry::recovered_shape(self.shape(), filter.shape(), params)?;
        debug!("deconvolution_to_input_gradient: allocating {shape} result");
        let mut result = self.sibling(shape);
        self.deconvolution_to_input_gradient_into(&mut result, filter, params)?;
        Ok(result)
    }

    /// [`Matrix::deconvolution_to_input_gradient`] written over `result`
    #[instrument(level = "trace", skip_all, fields(gradient = %self.shape(), filter = %filter.shape()))]
    pub fn deconvolution_to_input_gradient_into<'a>(
        &self,
        result: &'a mut Matrix,
        filter: &Matrix,
        params: ConvParams,
    ) -> Result<&'a mut Matrix> {
        let shape = ConvGeometry::recovered_shape(self.shape(), filter.shape(), params)?;
        result.require_shape("deconvolution_to_input_gradient", shape)?;
        let geometry = ConvGeometry::new(shape, filter.shape(), params)?;

        let grad = self.require_store("deconvolution_to_input_gradient")?;
        let taps = filter.require_store("deconvolution_to_input_gradient")?;
        let mut scratch = result.sibling(filter.shape());
        let scaled = scratch.as_mut_slice();
        let out = result.require_store_mut("deconvolution_to_input_gradient")?;
        out.fill(0.0);

        let k = kernel();
        for ((i, j), &g) in geometry.window_origins().zip(grad) {
            if g == 0.0 {
                continue;
            }
            k.scale_into(taps, scaled, g);
            geometry.scatter_add(i, j, scaled, out);
        }
        Ok(result)
    }

    /// Accumulate the gradient with respect to the filter into `filter_gradient`
    ///
    /// `input` is the forward input and `self` must have the forward output
    /// shape. Existing values in `filter_gradient` are kept and added to, so
    /// callers zero it between batches.
    #[instrument(level = "trace", skip_all, fields(gradient = %self.shape(), input = %input.shape()))]
    pub fn deconvolution_to_filter_gradient<'a>(
        &self,
        filter_gradient: &'a mut Matrix,
        input: &Matrix,
        params: ConvParams,
    ) -> Result<&'a mut Matrix> {
        let geometry = ConvGeometry::new(input.shape(), filter_gradient.shape(), params)?;
        self.require_shape("deconvolution_to_filter_gradient", geometry.output_shape())?;

        let grad = self.require_store("deconvolution_to_filter_gradient")?;
        let source = input.require_store("deconvolution_to_filter_gradient")?;
        let mut scratch = filter_gradient.sibling(filter_gradient.shape());
        let patch = scratch.as_mut_slice();
        let acc = filter_gradient.require_store_mut("deconvolution_to_filter_gradient")?;

        let k = kernel();
        for ((i, j), &g) in geometry.window_origins().zip(grad) {
            if g == 0.0 {
                continue;
            }
            patch.fill(0.0);
            geometry.gather(i, j, source, patch);
            k.scaled_add(acc, patch, g);
        }
        Ok(filter_gradient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use densemat_core::{Error, Shape};

    fn m(x: usize, y: usize, values: &[f32]) -> Matrix {
        Matrix::from_row_major(x, y, values).unwrap()
    }

    #[test]
    fn test_input_gradient_single_window() {
        let grad = m(1, 1, &[2.0]);
        let filter = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let dx = grad
            .deconvolution_to_input_gradient(&filter, ConvParams::default())
            .unwrap();
        assert_eq!(dx.shape(), Shape::new(2, 2));
        assert_eq!(dx.as_slice(), &[2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_input_gradient_overlapping_windows_accumulate() {
        let grad = m(1, 2, &[1.0, 1.0]);
        let filter = m(1, 2, &[1.0, 10.0]);
        let dx = grad
            .deconvolution_to_input_gradient(&filter, ConvParams::default())
            .unwrap();
        assert_eq!(dx.shape(), Shape::new(1, 3));
        assert_eq!(dx.as_slice(), &[1.0, 11.0, 10.0]);
    }

    #[test]
    fn test_input_gradient_drops_padding_taps() {
        // 2x2 input, 1x1 filter, padding 1 -> 4x4 output
        let mut grad = Matrix::new(4, 4);
        grad.add_scalar(1.0);
        let filter = m(1, 1, &[3.0]);
        let dx = grad
            .deconvolution_to_input_gradient(&filter, ConvParams::new(1, 1))
            .unwrap();
        assert_eq!(dx.shape(), Shape::new(2, 2));
        assert_eq!(dx.as_slice(), &[3.0; 4]);
    }

    #[test]
    fn test_input_gradient_into_clears_result() {
        let grad = m(1, 1, &[1.0]);
        let filter = m(1, 1, &[5.0]);
        let mut dx = m(1, 1, &[100.0]);
        grad.deconvolution_to_input_gradient_into(&mut dx, &filter, ConvParams::default())
            .unwrap();
        assert_eq!(dx.as_slice(), &[5.0]);

        let mut wrong = Matrix::new(2, 1);
        assert!(matches!(
            grad.deconvolution_to_input_gradient_into(&mut wrong, &filter, ConvParams::default()),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_input_gradient_rejects_excess_padding() {
        let grad = m(1, 1, &[1.0]);
        let filter = m(1, 1, &[1.0]);
        assert!(matches!(
            grad.deconvolution_to_input_gradient(&filter, ConvParams::new(1, 1)),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_filter_gradient_accumulates() {
        let input = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let grad = m(1, 1, &[0.5]);
        let mut dw = m(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        grad.deconvolution_to_filter_gradient(&mut dw, &input, ConvParams::default())
            .unwrap();
        assert_eq!(dw.as_slice(), &[1.5, 2.0, 2.5, 3.0]);
        grad.deconvolution_to_filter_gradient(&mut dw, &input, ConvParams::default())
            .unwrap();
        assert_eq!(dw.as_slice(), &[2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_filter_gradient_requires_output_shape() {
        let input = Matrix::new(3, 3);
        let mut dw = Matrix::new(2, 2);
        let grad = Matrix::new(3, 3);
        assert!(matches!(
            grad.deconvolution_to_filter_gradient(&mut dw, &input, ConvParams::default()),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
