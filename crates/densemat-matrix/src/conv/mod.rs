//! 2D convolution and its two adjoints
//!
//! All three operators walk the same window origins over the conceptually
//! zero-padded input and map every filter tap back to an unpadded coordinate
//! through [`ConvGeometry::source_index`]. Keeping that predicate in one place
//! is what keeps the backward operators exact adjoints of the forward one.

mod backward;
mod forward;

use densemat_core::{Error, Result, Shape};
use serde::{Deserialize, Serialize};

/// Zero padding and stride of a convolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvParams {
    /// Zero rows/columns added on every side of the input
    pub padding: usize,
    /// Step between window origins, at least 1
    pub stride: usize,
}

impl Default for ConvParams {
    fn default() -> Self {
        Self {
            padding: 0,
            stride: 1,
        }
    }
}

impl ConvParams {
    pub fn new(padding: usize, stride: usize) -> Self {
        Self { padding, stride }
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.stride == 0 {
            return Err(Error::invalid_parameter("stride must be at least 1"));
        }
        Ok(())
    }
}

/// Window layout of one convolution: input extent, filter extent, params
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvGeometry {
    input: Shape,
    filter: Shape,
    padding: usize,
    stride: usize,
}

impl ConvGeometry {
    /// Validate that at least one window fits on the padded input
    pub fn new(input: Shape, filter: Shape, params: ConvParams) -> Result<Self> {
        params.validate()?;
        if filter.x_len == 0 || filter.y_len == 0 {
            return Err(Error::invalid_parameter(format!(
                "filter must be non-empty, got {filter}"
            )));
        }
        let padded = Shape::new(
            padded_len(input.x_len, params.padding)?,
            padded_len(input.y_len, params.padding)?,
        );
        if filter.x_len > padded.x_len || filter.y_len > padded.y_len {
            return Err(Error::shape_mismatch("convolution window", padded, filter));
        }
        Ok(Self {
            input,
            filter,
            padding: params.padding,
            stride: params.stride,
        })
    }

    pub fn input(&self) -> Shape {
        self.input
    }

    pub fn filter(&self) -> Shape {
        self.filter
    }

    /// `(n - f + 2p) / s + 1` per axis
    pub fn output_shape(&self) -> Shape {
        Shape::new(
            output_len(self.input.x_len, self.filter.x_len, self.padding, self.stride),
            output_len(self.input.y_len, self.filter.y_len, self.padding, self.stride),
        )
    }

    /// Input extent recovered from an output-side gradient: `(o - 1) * s + f - 2p`
    pub fn recovered_shape(output: Shape, filter: Shape, params: ConvParams) -> Result<Shape> {
        params.validate()?;
        let axis = |o: usize, f: usize| -> Result<usize> {
            if o == 0 {
                return Err(Error::invalid_parameter(format!(
                    "gradient must be non-empty, got {output}"
                )));
            }
            let span = (o - 1)
                .checked_mul(params.stride)
                .and_then(|span| span.checked_add(f))
                .ok_or_else(|| {
                    Error::invalid_parameter(format!(
                        "stride {} overflows the input extent for {output} gradient",
                        params.stride
                    ))
                })?;
            span.checked_sub(padded_len(0, params.padding)?)
                .ok_or_else(|| {
                    Error::invalid_parameter(format!(
                        "padding {} leaves no input for {output} gradient and {filter} filter",
                        params.padding
                    ))
                })
        };
        Ok(Shape::new(
            axis(output.x_len, filter.x_len)?,
            axis(output.y_len, filter.y_len)?,
        ))
    }

    /// Map a coordinate on the padded input to the unpadded input
    ///
    /// `None` means the tap lands in the zero padding and contributes nothing.
    #[inline]
    pub fn source_index(padded: usize, padding: usize, extent: usize) -> Option<usize> {
        padded.checked_sub(padding).filter(|&c| c < extent)
    }

    /// Top-left corners (padded coordinates) of every window, row-major
    ///
    /// The n-th origin produces output element n.
    pub fn window_origins(&self) -> impl Iterator<Item = (usize, usize)> {
        let span_x = self.input.x_len + 2 * self.padding - self.filter.x_len;
        let span_y = self.input.y_len + 2 * self.padding - self.filter.y_len;
        let stride = self.stride;
        (0..=span_x)
            .step_by(stride)
            .flat_map(move |i| (0..=span_y).step_by(stride).map(move |j| (i, j)))
    }

    /// Visit every in-bounds tap of the window at `(i, j)` as
    /// `(filter offset, input offset)`
    #[inline]
    pub fn for_each_tap(&self, i: usize, j: usize, mut f: impl FnMut(usize, usize)) {
        for xc in 0..self.filter.x_len {
            let Some(sx) = Self::source_index(i + xc, self.padding, self.input.x_len) else {
                continue;
            };
            for yc in 0..self.filter.y_len {
                let Some(sy) = Self::source_index(j + yc, self.padding, self.input.y_len) else {
                    continue;
                };
                f(xc * self.filter.y_len + yc, sx * self.input.y_len + sy);
            }
        }
    }

    /// Copy the window at `(i, j)` into `patch`; padding taps are left untouched
    #[inline]
    pub fn gather(&self, i: usize, j: usize, input: &[f32], patch: &mut [f32]) {
        debug_assert_eq!(input.len(), self.input.size());
        debug_assert_eq!(patch.len(), self.filter.size());
        self.for_each_tap(i, j, |tap, src| patch[tap] = input[src]);
    }

    /// Add `values` into the window at `(i, j)` of `target`, skipping padding taps
    #[inline]
    pub fn scatter_add(&self, i: usize, j: usize, values: &[f32], target: &mut [f32]) {
        debug_assert_eq!(target.len(), self.input.size());
        debug_assert_eq!(values.len(), self.filter.size());
        self.for_each_tap(i, j, |tap, dst| target[dst] += values[tap]);
    }
}

/// `n + 2p`, rejecting padding that does not fit in `usize`
fn padded_len(n: usize, padding: usize) -> Result<usize> {
    padding
        .checked_mul(2)
        .and_then(|both| both.checked_add(n))
        .ok_or_else(|| Error::invalid_parameter(format!("padding {padding} is too large")))
}

#[inline]
fn output_len(n: usize, f: usize, padding: usize, stride: usize) -> usize {
    (n + 2 * padding - f) / stride + 1
}
