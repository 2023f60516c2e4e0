//! Raw per-party share storage.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::errors::MpcError;
use crate::shape::Shape;

/// One party's share of every element of a tensor.
///
/// The buffer is wiped when dropped and never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareBuffer(Vec<u64>);

impl ShareBuffer {
    pub fn new(words: Vec<u64>) -> Self {
        Self(words)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [u64] {
        &mut self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for ShareBuffer {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for ShareBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShareBuffer(<{} words>)", self.0.len())
    }
}

impl From<Vec<u64>> for ShareBuffer {
    fn from(words: Vec<u64>) -> Self {
        Self::new(words)
    }
}

/// The shares held by all parties for a tensor of a given shape.
///
/// Deserialization goes through [`Shares::new`], so shares received from
/// another worker are checked like locally built ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawShares")]
pub struct Shares {
    shape: Shape,
    parties: Vec<ShareBuffer>,
}

#[derive(Deserialize)]
struct RawShares {
    shape: Shape,
    parties: Vec<Vec<u64>>,
}

impl TryFrom<RawShares> for Shares {
    type Error = MpcError;

    fn try_from(raw: RawShares) -> Result<Self, MpcError> {
        Self::new(raw.shape, raw.parties)
    }
}

impl Shares {
    /// Validates that there are at least two parties and that every share
    /// covers the whole shape.
    pub fn new(shape: Shape, parties: Vec<Vec<u64>>) -> Result<Self, MpcError> {
        if parties.len() < 2 {
            return Err(MpcError::InvalidParties(parties.len()));
        }
        let expected = shape.checked_numel()?;
        for (party, words) in parties.iter().enumerate() {
            if words.len() != expected {
                return Err(MpcError::ShareLengthMismatch {
                    party,
                    expected,
                    got: words.len(),
                });
            }
        }
        Ok(Self {
            shape,
            parties: parties.into_iter().map(ShareBuffer::new).collect(),
        })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn num_parties(&self) -> usize {
        self.parties.len()
    }

    pub fn party(&self, id: usize) -> Option<&ShareBuffer> {
        self.parties.get(id)
    }

    pub fn parties(&self) -> &[ShareBuffer] {
        &self.parties
    }

    pub(crate) fn parties_mut(&mut self) -> &mut [ShareBuffer] {
        &mut self.parties
    }

    /// Sums the shares element-wise over `Z_2^64`.
    pub fn reconstruct_arithmetic(&self) -> Vec<u64> {
        self.reconstruct(u64::wrapping_add)
    }

    /// XORs the shares element-wise.
    pub fn reconstruct_binary(&self) -> Vec<u64> {
        self.reconstruct(|acc, word| acc ^ word)
    }

    #[cfg(feature = "parallel")]
    fn reconstruct(&self, op: impl Fn(u64, u64) -> u64 + Sync) -> Vec<u64> {
        use rayon::prelude::*;

        (0..self.shape.numel())
            .into_par_iter()
            .map(|i| {
                self.parties
                    .iter()
                    .fold(0u64, |acc, share| op(acc, share.0[i]))
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn reconstruct(&self, op: impl Fn(u64, u64) -> u64) -> Vec<u64> {
        (0..self.shape.numel())
            .map(|i| {
                self.parties
                    .iter()
                    .fold(0u64, |acc, share| op(acc, share.0[i]))
            })
            .collect()
    }
}
