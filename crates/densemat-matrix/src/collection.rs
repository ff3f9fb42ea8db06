//! Owning list of matrices, e.g. the per-layer weights of a network

use crate::Matrix;
use densemat_core::Shape;
use std::ops::{Index, IndexMut};

/// Ordered collection that owns its matrices
///
/// Dropping the collection drops every entry once, returning each store to
/// its pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatrixCollection {
    items: Vec<Matrix>,
}

impl MatrixCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// One zero-filled matrix per shape, in order
    pub fn with_shapes<I>(shapes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Shape>,
    {
        shapes
            .into_iter()
            .map(|shape| Matrix::with_shape(shape.into()))
            .collect()
    }

    /// Append `matrix` and return its index
    pub fn push(&mut self, matrix: Matrix) -> usize {
        self.items.push(matrix);
        self.items.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Matrix> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Matrix> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Matrix> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Matrix> {
        self.items.iter_mut()
    }

    /// Shapes of every entry, in order
    pub fn shapes(&self) -> Vec<Shape> {
        self.items.iter().map(Matrix::shape).collect()
    }

    /// Zero every entry, keeping shapes and stores
    pub fn zero_init_all(&mut self) {
        for m in &mut self.items {
            m.zero_init();
        }
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl Index<usize> for MatrixCollection {
    type Output = Matrix;

    fn index(&self, index: usize) -> &Matrix {
        &self.items[index]
    }
}

impl IndexMut<usize> for MatrixCollection {
    fn index_mut(&mut self, index: usize) -> &mut Matrix {
        &mut self.items[index]
    }
}

impl FromIterator<Matrix> for MatrixCollection {
    fn from_iter<I: IntoIterator<Item = Matrix>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Extend<Matrix> for MatrixCollection {
    fn extend<I: IntoIterator<Item = Matrix>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl IntoIterator for MatrixCollection {
    type Item = Matrix;
    type IntoIter = std::vec::IntoIter<Matrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a MatrixCollection {
    type Item = &'a Matrix;
    type IntoIter = std::slice::Iter<'a, Matrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a mut MatrixCollection {
    type Item = &'a mut Matrix;
    type IntoIter = std::slice::IterMut<'a, Matrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}
