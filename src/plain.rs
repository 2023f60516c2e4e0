use serde::{Deserialize, Serialize};

use crate::errors::MpcError;
use crate::shape::Shape;

/// A public (non secret-shared) tensor of real values.
///
/// Holds contiguous, row-major `f64` data with an associated shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPlainTensor")]
pub struct PlainTensor {
    shape: Shape,
    data: Vec<f64>,
}

#[derive(Deserialize)]
struct RawPlainTensor {
    shape: Shape,
    data: Vec<f64>,
}

impl TryFrom<RawPlainTensor> for PlainTensor {
    type Error = MpcError;

    fn try_from(raw: RawPlainTensor) -> Result<Self, MpcError> {
        Self::new(raw.data, raw.shape)
    }
}

impl PlainTensor {
    pub fn new(data: Vec<f64>, shape: Shape) -> Result<Self, MpcError> {
        if data.len() != shape.checked_numel()? {
            return Err(MpcError::ShapeMismatch {
                expected: shape.dims().to_vec(),
                got: vec![data.len()],
            });
        }
        Ok(Self { shape, data })
    }

    pub fn scalar(value: f64) -> Self {
        Self {
            shape: Shape::scalar(),
            data: vec![value],
        }
    }

    pub fn zeros(shape: Shape) -> Result<Self, MpcError> {
        let n = shape.checked_numel()?;
        Ok(Self {
            shape,
            data: vec![0.0; n],
        })
    }

    /// One-dimensional tensor over `values`.
    pub fn from_vec(values: Vec<f64>) -> Self {
        Self {
            shape: Shape::new(vec![values.len()]),
            data: values,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Returns the single value of a one-element tensor.
    pub fn item(&self) -> Option<f64> {
        match self.data.as_slice() {
            [value] => Some(*value),
            _ => None,
        }
    }
}
