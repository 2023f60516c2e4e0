//! Fixed-point encoding between real numbers and ring elements.

use serde::{Deserialize, Serialize};

use crate::errors::MpcError;

/// Precision used when the caller does not pick one.
pub const DEFAULT_PRECISION_BITS: u32 = 16;

/// Largest supported precision. Leaves 31 bits of integer range in the
/// 64-bit ring after scaling.
pub const MAX_PRECISION_BITS: u32 = 32;

/// Maps `f64` values onto `Z_2^64` with a scale of `2^precision_bits`.
///
/// A precision of zero is the unit encoder: values are rounded to
/// integers and never downscaled on decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEncoder")]
pub struct FixedPointEncoder {
    precision_bits: u32,
}

/// Wire form of [`FixedPointEncoder`], checked through
/// [`FixedPointEncoder::new`] on the way in.
#[derive(Deserialize)]
struct RawEncoder {
    precision_bits: u32,
}

impl TryFrom<RawEncoder> for FixedPointEncoder {
    type Error = MpcError;

    fn try_from(raw: RawEncoder) -> Result<Self, MpcError> {
        Self::new(raw.precision_bits)
    }
}

/// `2^63`, the first magnitude outside the signed 64-bit range.
const RING_LIMIT: f64 = 9_223_372_036_854_775_808.0;

impl FixedPointEncoder {
    pub fn new(precision_bits: u32) -> Result<Self, MpcError> {
        if precision_bits > MAX_PRECISION_BITS {
            return Err(MpcError::InvalidPrecision(precision_bits));
        }
        Ok(Self { precision_bits })
    }

    /// Encoder that performs no scaling.
    pub const fn unit() -> Self {
        Self { precision_bits: 0 }
    }

    pub fn precision_bits(&self) -> u32 {
        self.precision_bits
    }

    pub fn scale(&self) -> u64 {
        1u64 << self.precision_bits
    }

    /// Encodes a real value, rounding to the nearest representable point.
    ///
    /// Saturates: NaN encodes as zero and out-of-range values clamp to the
    /// signed 64-bit bounds. Use [`FixedPointEncoder::try_encode`] to reject
    /// them instead.
    pub fn encode(&self, value: f64) -> u64 {
        let scaled = (value * self.scale() as f64).round();
        // Two's complement embedding of the signed fixed-point value.
        (scaled as i64) as u64
    }

    /// Encodes a real value, failing when it is not finite or does not fit
    /// the ring after scaling.
    pub fn try_encode(&self, value: f64) -> Result<u64, MpcError> {
        let scaled = (value * self.scale() as f64).round();
        if !scaled.is_finite() || !(-RING_LIMIT..RING_LIMIT).contains(&scaled) {
            return Err(MpcError::UnencodableValue {
                value: value.to_string(),
                precision_bits: self.precision_bits,
            });
        }
        Ok((scaled as i64) as u64)
    }

    pub fn decode(&self, element: u64) -> f64 {
        (element as i64) as f64 / self.scale() as f64
    }

    pub fn encode_all(&self, values: &[f64]) -> Result<Vec<u64>, MpcError> {
        values.iter().map(|v| self.try_encode(*v)).collect()
    }

    pub fn decode_all(&self, elements: &[u64]) -> Vec<f64> {
        elements.iter().map(|e| self.decode(*e)).collect()
    }
}

impl Default for FixedPointEncoder {
    fn default() -> Self {
        Self {
            precision_bits: DEFAULT_PRECISION_BITS,
        }
    }
}
