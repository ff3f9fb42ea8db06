//! Forward cross-correlation over the zero-padded input

use super::{ConvGeometry, ConvParams};
use crate::Matrix;
use densemat_core::{kernel, Error, Result, VectorKernel};
use tracing::{debug, instrument};

impl Matrix {
    /// Cross-correlate `filter` over this matrix
    ///
    /// Output extent per axis is `(n - f + 2p) / s + 1`. Taps that land in the
    /// padding read as zero.
    pub fn convolution(&self, filter: &Matrix, params: ConvParams) -> Result<Matrix> {
        let geometry = self.forward_geometry(filter, params)?;
        let shape = geometry.output_shape();
        debug!("convolution: allocating {shape} result");
        let mut result = self.sibling(shape);
        self.convolve(&geometry, &mut result, filter)?;
        Ok(result)
    }

    /// [`Matrix::convolution`] written over `result`, which must already have
    /// the output shape
    pub fn convolution_into<'a>(
        &self,
        result: &'a mut Matrix,
        filter: &Matrix,
        params: ConvParams,
    ) -> Result<&'a mut Matrix> {
        let geometry = self.forward_geometry(filter, params)?;
        result.require_shape("convolution", geometry.output_shape())?;
        self.convolve(&geometry, result, filter)?;
        Ok(result)
    }

    fn forward_geometry(&self, filter: &Matrix, params: ConvParams) -> Result<ConvGeometry> {
        if filter.x_len() > self.x_len() || filter.y_len() > self.y_len() {
            return Err(Error::shape_mismatch(
                "convolution",
                self.shape(),
                filter.shape(),
            ));
        }
        ConvGeometry::new(self.shape(), filter.shape(), params)
    }

    #[instrument(level = "trace", skip_all, fields(input = %self.shape(), filter = %filter.shape()))]
    fn convolve(&self, geometry: &ConvGeometry, result: &mut Matrix, filter: &Matrix) -> Result<()> {
        let input = self.require_store("convolution")?;
        let taps = filter.require_store("convolution")?;

        let mut scratch = result.sibling(filter.shape());
        let patch = scratch.as_mut_slice();
        let out = result.require_store_mut("convolution")?;
        let k = kernel();

        for ((i, j), slot) in geometry.window_origins().zip(out.iter_mut()) {
            patch.fill(0.0);
            geometry.gather(i, j, input, patch);
            *slot = k.dot_product(patch, taps);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use densemat_core::Shape;

    fn m(x: usize, y: usize, values: &[f32]) -> Matrix {
        Matrix::from_row_major(x, y, values).unwrap()
    }

    #[test]
    fn test_full_window_identity_filter() {
        let input = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let filter = Matrix::identity(2);
        let out = input.convolution(&filter, ConvParams::default()).unwrap();
        assert_eq!(out.shape(), Shape::new(1, 1));
        assert_eq!(out.as_slice(), &[5.0]);
    }

    #[test]
    fn test_valid_convolution() {
        let input = m(3, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let filter = m(2, 2, &[1.0, 0.0, 0.0, -1.0]);
        let out = input.convolution(&filter, ConvParams::default()).unwrap();
        assert_eq!(out.shape(), Shape::new(2, 2));
        assert_eq!(out.as_slice(), &[-4.0, -4.0, -4.0, -4.0]);
    }

    #[test]
    fn test_padding_reads_zero() {
        let input = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let filter = m(1, 1, &[2.0]);
        let out = input.convolution(&filter, ConvParams::new(1, 1)).unwrap();
        assert_eq!(out.shape(), Shape::new(4, 4));
        #[rustfmt::skip]
        let expected = [
            0.0, 0.0, 0.0, 0.0,
            0.0, 2.0, 4.0, 0.0,
            0.0, 6.0, 8.0, 0.0,
            0.0, 0.0, 0.0, 0.0,
        ];
        assert_eq!(out.as_slice(), &expected);
    }

    #[test]
    fn test_stride_skips_windows() {
        let input = m(1, 5, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let filter = m(1, 1, &[1.0]);
        let out = input.convolution(&filter, ConvParams::new(0, 2)).unwrap();
        assert_eq!(out.shape(), Shape::new(1, 3));
        assert_eq!(out.as_slice(), &[1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_convolution_into_overwrites() {
        let input = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let filter = m(2, 2, &[1.0; 4]);
        let mut result = m(1, 1, &[99.0]);
        input
            .convolution_into(&mut result, &filter, ConvParams::default())
            .unwrap();
        assert_eq!(result.as_slice(), &[10.0]);

        let mut wrong = Matrix::new(2, 2);
        assert!(matches!(
            input.convolution_into(&mut wrong, &filter, ConvParams::default()),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let input = Matrix::new(2, 2);
        let big = Matrix::new(3, 1);
        assert!(input.convolution(&big, ConvParams::new(1, 1)).is_err());
        let filter = Matrix::new(1, 1);
        assert!(matches!(
            input.convolution(&filter, ConvParams::new(0, 0)),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            Matrix::default().convolution(&Matrix::default(), ConvParams::default()),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            input.convolution(&filter, ConvParams::new(usize::MAX, 1)),
            Err(Error::InvalidParameter(_))
        ));
    }
}
