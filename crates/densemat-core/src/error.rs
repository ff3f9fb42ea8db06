//! Error types for dense matrix operations
//!
//! Provides a unified error type for all densemat crates.

use crate::Shape;
use thiserror::Error;

/// Core error type for matrix and kernel operations
#[derive(Error, Debug)]
pub enum Error {
    /// Two operands (or an operand and a supplied result) disagree on shape
    #[error("Shape mismatch in {operation}: expected {expected}, got {actual}")]
    ShapeMismatch {
        operation: &'static str,
        expected: Shape,
        actual: Shape,
    },

    /// A reshape-free shape change would alter the element count
    #[error("Size mismatch in {operation}: expected {expected} elements, got {actual}")]
    SizeMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Element access outside the logical extent
    #[error("Index ({x}, {y}) out of bounds for {shape} matrix")]
    IndexOutOfBounds { x: usize, y: usize, shape: Shape },

    /// Operation requires a backing store but none was allocated
    #[error("Matrix has no backing store: {0}")]
    EmptyStorage(&'static str),

    /// Operation requires a square matrix
    #[error("{operation} requires a square matrix, got {shape}")]
    NotSquare {
        operation: &'static str,
        shape: Shape,
    },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Memory allocation or pool error
    #[error("Memory error: {0}")]
    Memory(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for mismatched operand shapes
    pub fn shape_mismatch(operation: &'static str, expected: Shape, actual: Shape) -> Self {
        Self::ShapeMismatch {
            operation,
            expected,
            actual,
        }
    }

    /// Create an error for a store whose element count cannot change in place
    pub fn size_mismatch(operation: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            operation,
            expected,
            actual,
        }
    }

    /// Create an error for a parameter outside its valid domain
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
