use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::MpcError;

/// A tensor shape, wrapping a vector of dimension sizes.
///
/// The empty shape is a scalar and holds one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Shape { dims }
    }

    pub fn scalar() -> Self {
        Shape { dims: Vec::new() }
    }

    pub fn from_slice(dims: &[usize]) -> Self {
        Shape {
            dims: dims.to_vec(),
        }
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements (product of all dimension sizes).
    ///
    /// Shapes held by [`crate::PlainTensor`] and [`crate::Shares`] are checked
    /// with [`Shape::checked_numel`] on construction, so this cannot overflow
    /// for them.
    pub fn numel(&self) -> usize {
        self.dims.iter().fold(1usize, |acc, d| acc.saturating_mul(*d))
    }

    /// Element count, or [`MpcError::ShapeOverflow`] when it exceeds `usize`.
    pub fn checked_numel(&self) -> Result<usize, MpcError> {
        self.dims
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(*d))
            .ok_or_else(|| MpcError::ShapeOverflow(self.dims.clone()))
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Computes row-major contiguous strides for this shape.
    ///
    /// For a shape [d0, d1, d2], the strides are [d1*d2, d2, 1].
    pub fn strides(&self) -> Vec<usize> {
        if self.dims.is_empty() {
            return vec![];
        }
        let mut strides = vec![0usize; self.dims.len()];
        strides[self.dims.len() - 1] = 1;
        for i in (0..self.dims.len() - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Resolves a coordinate prefix into the flat element range it selects
    /// and the shape of that block.
    ///
    /// An index with fewer coordinates than dimensions selects the whole
    /// trailing sub-tensor; an empty index selects everything.
    pub fn block(&self, index: &[usize]) -> Result<(std::ops::Range<usize>, Shape), MpcError> {
        let out_of_bounds = || MpcError::IndexOutOfBounds {
            index: index.to_vec(),
            shape: self.dims.clone(),
        };
        if index.len() > self.dims.len() {
            return Err(out_of_bounds());
        }
        let strides = self.strides();
        let mut start = 0;
        for (axis, &coord) in index.iter().enumerate() {
            if coord >= self.dims[axis] {
                return Err(out_of_bounds());
            }
            start += coord * strides[axis];
        }
        let block = Shape::from_slice(&self.dims[index.len()..]);
        let len = block.checked_numel()?;
        Ok((start..start + len, block))
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape::from_slice(dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}
