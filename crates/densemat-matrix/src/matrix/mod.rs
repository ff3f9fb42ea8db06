//! Dense row-major `f32` matrix
//!
//! A [`Matrix`] exclusively owns one contiguous store checked out of a
//! [`BufferPool`]. Element `(x, y)` lives at offset `x * y_len + y`, and the
//! store length always equals `x_len * y_len`. Dropping the matrix returns its
//! store to the pool.
//!
//! Operations that mutate in place return `&mut Self` (or
//! `Result<&mut Self>` when they have preconditions) so they can be chained:
//!
//! ```rust
//! use densemat_matrix::Matrix;
//!
//! # fn main() -> densemat_core::Result<()> {
//! let mut m = Matrix::from_row_major(2, 2, &[1.0, 4.0, 9.0, 16.0])?;
//! m.pow(0.5).scale(2.0).add_scalar(-2.0);
//! assert_eq!(m.as_slice(), &[0.0, 2.0, 4.0, 6.0]);
//! # Ok(())
//! # }
//! ```

mod elementwise;
mod multiply;

use densemat_core::{
    global_pool, BufferPool, Error, GaussianSource, PooledBuffer, Result, Shape,
    CONVERGENCE_EPSILON,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

/// Dense 2D single-precision matrix
///
/// A default-constructed matrix has no store; shape-dependent operations on
/// it fail with [`Error::EmptyStorage`] until [`Matrix::reset`] or
/// [`Matrix::reshape`] allocates one.
#[derive(Default)]
pub struct Matrix {
    x_len: usize,
    y_len: usize,
    store: Option<PooledBuffer<f32>>,
}

impl Matrix {
    /// Create a zero-filled `x_len` x `y_len` matrix from the global pool
    pub fn new(x_len: usize, y_len: usize) -> Self {
        Self::new_in(global_pool(), x_len, y_len)
    }

    /// Create a zero-filled matrix whose store comes from `pool`
    pub fn new_in(pool: &Arc<BufferPool<f32>>, x_len: usize, y_len: usize) -> Self {
        Self {
            x_len,
            y_len,
            store: Some(pool.checkout(x_len * y_len)),
        }
    }

    pub fn with_shape(shape: Shape) -> Self {
        Self::new(shape.x_len, shape.y_len)
    }

    /// Build a matrix from row-major values
    pub fn from_row_major(x_len: usize, y_len: usize, values: &[f32]) -> Result<Self> {
        if values.len() != x_len * y_len {
            return Err(Error::size_mismatch(
                "from_row_major",
                x_len * y_len,
                values.len(),
            ));
        }
        let mut m = Self::new(x_len, y_len);
        m.as_mut_slice().copy_from_slice(values);
        Ok(m)
    }

    /// The `n` x `n` identity matrix
    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// A zero-filled matrix drawing its store from the same pool as `self`
    pub(crate) fn sibling(&self, shape: Shape) -> Self {
        let store = match &self.store {
            Some(store) => store.sibling(shape.size()),
            None => global_pool().checkout(shape.size()),
        };
        Self {
            x_len: shape.x_len,
            y_len: shape.y_len,
            store: Some(store),
        }
    }

    #[inline]
    pub fn x_len(&self) -> usize {
        self.x_len
    }

    #[inline]
    pub fn y_len(&self) -> usize {
        self.y_len
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        Shape::new(self.x_len, self.y_len)
    }

    /// Number of elements, `x_len * y_len`
    #[inline]
    pub fn size(&self) -> usize {
        self.x_len * self.y_len
    }

    /// Whether a backing store has been acquired
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.store.is_some()
    }

    /// Row-major view of the store (empty when unallocated)
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        match &self.store {
            Some(store) => store.as_slice(),
            None => &[],
        }
    }

    /// Mutable row-major view of the store (empty when unallocated)
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        match &mut self.store {
            Some(store) => store.as_mut_slice(),
            None => &mut [],
        }
    }

    pub(crate) fn require_store(&self, operation: &'static str) -> Result<&[f32]> {
        self.store
            .as_ref()
            .map(|store| store.as_slice())
            .ok_or(Error::EmptyStorage(operation))
    }

    pub(crate) fn require_store_mut(&mut self, operation: &'static str) -> Result<&mut [f32]> {
        self.store
            .as_mut()
            .map(|store| store.as_mut_slice())
            .ok_or(Error::EmptyStorage(operation))
    }

    pub(crate) fn require_shape(&self, operation: &'static str, expected: Shape) -> Result<()> {
        if self.shape() != expected {
            return Err(Error::shape_mismatch(operation, expected, self.shape()));
        }
        Ok(())
    }

    /// Row `x` as a slice
    #[inline]
    pub fn row(&self, x: usize) -> &[f32] {
        debug_assert!(x < self.x_len, "row {x} out of bounds for {}", self.shape());
        &self.as_slice()[x * self.y_len..(x + 1) * self.y_len]
    }

    #[inline]
    pub fn row_mut(&mut self, x: usize) -> &mut [f32] {
        debug_assert!(x < self.x_len, "row {x} out of bounds for {}", self.shape());
        let y_len = self.y_len;
        &mut self.as_mut_slice()[x * y_len..(x + 1) * y_len]
    }

    /// Run `f` over the raw row-major store
    pub fn operate<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut [f32]) -> R,
    {
        f(self.as_mut_slice())
    }

    /// Set the logical shape, allocating the store if it is absent
    ///
    /// An existing store is never reallocated: the new shape must hold the
    /// same number of elements, otherwise the shape is left untouched and
    /// [`Error::SizeMismatch`] is returned.
    pub fn reset(&mut self, x_len: usize, y_len: usize) -> Result<&mut Self> {
        match &self.store {
            None => self.store = Some(global_pool().checkout(x_len * y_len)),
            Some(store) if store.len() != x_len * y_len => {
                return Err(Error::size_mismatch("reset", store.len(), x_len * y_len));
            }
            Some(_) => {}
        }
        self.x_len = x_len;
        self.y_len = y_len;
        Ok(self)
    }

    /// Deep copy into a new matrix from the same pool
    pub fn copy(&self) -> Matrix {
        Self {
            x_len: self.x_len,
            y_len: self.y_len,
            store: self.store.clone(),
        }
    }

    /// Overwrite `target` with this matrix's values; shapes must match
    pub fn copy_into<'a>(&self, target: &'a mut Matrix) -> Result<&'a mut Matrix> {
        target.require_shape("copy_into", self.shape())?;
        target.as_mut_slice().copy_from_slice(self.as_slice());
        Ok(target)
    }

    /// Change the shape and resize the store to match
    ///
    /// The row-major prefix is kept; elements past the old size are zero.
    /// This is structural, values do not move to their old `(x, y)`.
    pub fn reshape(&mut self, new_x: usize, new_y: usize) -> &mut Self {
        if self.x_len == new_x && self.y_len == new_y && self.store.is_some() {
            return self;
        }
        self.x_len = new_x;
        self.y_len = new_y;
        match &mut self.store {
            Some(store) => store.resize(new_x * new_y),
            None => self.store = Some(global_pool().checkout(new_x * new_y)),
        }
        self
    }

    /// Mutable reference to element `(x, y)`
    pub fn get_element(&mut self, x: usize, y: usize) -> Result<&mut f32> {
        let shape = self.shape();
        let offset = shape
            .offset(x, y)
            .ok_or(Error::IndexOutOfBounds { x, y, shape })?;
        Ok(&mut self.require_store_mut("get_element")?[offset])
    }

    /// Value of element `(x, y)`
    pub fn get(&self, x: usize, y: usize) -> Result<f32> {
        let shape = self.shape();
        let offset = shape
            .offset(x, y)
            .ok_or(Error::IndexOutOfBounds { x, y, shape })?;
        Ok(self.require_store("get")?[offset])
    }

    /// Swap rows and columns
    ///
    /// Row and column vectors keep their store and only swap extents. Any
    /// other shape gets a fresh store; the old one goes back to the pool.
    pub fn transpose(&mut self) -> Result<&mut Self> {
        let store = self.store.as_ref().ok_or(Error::EmptyStorage("transpose"))?;
        let (x_len, y_len) = (self.x_len, self.y_len);

        if x_len != 1 && y_len != 1 {
            let mut transposed = store.sibling(x_len * y_len);
            for (i, row) in store.chunks_exact(y_len.max(1)).take(x_len).enumerate() {
                for (j, &value) in row.iter().enumerate() {
                    transposed[j * x_len + i] = value;
                }
            }
            self.store = Some(transposed);
        }

        std::mem::swap(&mut self.x_len, &mut self.y_len);
        Ok(self)
    }

    /// Rotate a square matrix by 180 degrees in place
    ///
    /// Rows are exchanged pairwise from the outside in. For odd sizes the
    /// middle row is left untouched rather than mirrored.
    pub fn rot180(&mut self) -> Result<&mut Self> {
        let shape = self.shape();
        let data = self.require_store_mut("rot180")?;
        if !shape.is_square() {
            return Err(Error::NotSquare {
                operation: "rot180",
                shape,
            });
        }
        // Swap (i, j) with (n-1-i, n-1-j) over the top half of the rows;
        // the middle row of an odd size stays as it is
        let n = shape.x_len;
        for i in 0..n / 2 {
            for j in 0..n {
                data.swap(i * n + j, (n - 1 - i) * n + (n - 1 - j));
            }
        }
        Ok(self)
    }

    /// Fill every element with 0
    pub fn zero_init(&mut self) -> &mut Self {
        self.as_mut_slice().fill(0.0);
        self
    }

    /// Fill every element with one independent Gaussian draw
    pub fn random_init<G: GaussianSource + ?Sized>(&mut self, source: &mut G) -> &mut Self {
        for value in self.as_mut_slice() {
            *value = source.next_gaussian();
        }
        self
    }

    /// [`Matrix::random_init`] with a deterministic generator
    pub fn random_init_seeded(&mut self, seed: u64) -> &mut Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.random_init(&mut rng)
    }

    /// Whether every pairwise absolute difference is within 1e-4
    ///
    /// NaN never converges.
    pub fn check_convergence(&self, other: &Matrix) -> Result<bool> {
        other.require_shape("check_convergence", self.shape())?;
        Ok(self
            .as_slice()
            .iter()
            .zip(other.as_slice())
            .all(|(a, b)| (a - b).abs() <= CONVERGENCE_EPSILON))
    }

    /// Print the matrix to stdout, one row per line
    pub fn debug_print(&self) {
        print!("{self}");
    }
}

impl Clone for Matrix {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.as_slice() == other.as_slice()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &f32 {
        debug_assert!(
            x < self.x_len && y < self.y_len,
            "index ({x}, {y}) out of bounds for {}",
            self.shape()
        );
        &self.as_slice()[x * self.y_len + y]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut f32 {
        debug_assert!(
            x < self.x_len && y < self.y_len,
            "index ({x}, {y}) out of bounds for {}",
            self.shape()
        );
        let y_len = self.y_len;
        &mut self.as_mut_slice()[x * y_len + y]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.y_len > 0 {
            for row in self.as_slice().chunks_exact(self.y_len) {
                for value in row {
                    write!(f, "{value:.6} ")?;
                }
                writeln!(f)?;
            }
        }
        writeln!(f)
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("shape", &self.shape())
            .field("data", &self.as_slice())
            .finish()
    }
}
