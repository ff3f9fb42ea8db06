//! Matrix extents

use serde::{Deserialize, Serialize};
use std::fmt;

/// Row and column extents of a dense row-major matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Shape {
    pub x_len: usize,
    pub y_len: usize,
}

impl Shape {
    pub const fn new(x_len: usize, y_len: usize) -> Self {
        Self { x_len, y_len }
    }

    /// Number of elements a store of this shape holds
    #[inline]
    pub const fn size(&self) -> usize {
        self.x_len * self.y_len
    }

    #[inline]
    pub const fn is_square(&self) -> bool {
        self.x_len == self.y_len
    }

    /// The shape with rows and columns swapped
    #[inline]
    pub const fn transposed(&self) -> Self {
        Self::new(self.y_len, self.x_len)
    }

    /// Linear offset of `(x, y)`, or `None` outside the extent
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.x_len && y < self.y_len {
            Some(x * self.y_len + y)
        } else {
            None
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x_len, self.y_len)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((x_len, y_len): (usize, usize)) -> Self {
        Self::new(x_len, y_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_row_major() {
        let shape = Shape::new(3, 4);
        assert_eq!(shape.size(), 12);
        assert_eq!(shape.offset(0, 0), Some(0));
        assert_eq!(shape.offset(1, 2), Some(6));
        assert_eq!(shape.offset(2, 3), Some(11));
        assert_eq!(shape.offset(3, 0), None);
        assert_eq!(shape.offset(0, 4), None);
    }

    #[test]
    fn test_transposed() {
        let shape = Shape::new(2, 7);
        assert_eq!(shape.transposed(), Shape::new(7, 2));
        assert!(!shape.is_square());
        assert!(Shape::new(5, 5).is_square());
    }

    #[test]
    fn test_serde_roundtrip() {
        let shape = Shape::new(8, 3);
        let json = serde_json::to_string(&shape).unwrap();
        assert_eq!(json, r#"{"x_len":8,"y_len":3}"#);
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);
    }
}
