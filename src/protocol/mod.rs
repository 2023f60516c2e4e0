use core::fmt::{Debug, Display};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{encoder::FixedPointEncoder, errors::MpcError, plain::PlainTensor};

/// Secret-sharing representation of an MPC tensor.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ptype {
    /// Shares sum to the value; suited to additions and multiplications.
    #[default]
    Arithmetic,
    /// Shares XOR to the value; suited to bitwise operations.
    Binary,
}

impl Display for Ptype {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Ptype::Arithmetic => f.write_str("arithmetic"),
            Ptype::Binary => f.write_str("binary"),
        }
    }
}

/// Extra knobs for a representation change.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Seed for the fresh masking randomness; entropy when `None`.
    pub seed: Option<u64>,
}

impl ConversionOptions {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

/// Right-hand side of an indexed assignment.
#[derive(Clone, Debug)]
pub enum ItemValue<T> {
    /// Public value, encoded by the target tensor.
    Plain(PlainTensor),
    /// Secret-shared value.
    Shared(T),
}

impl<T> From<PlainTensor> for ItemValue<T> {
    fn from(value: PlainTensor) -> Self {
        ItemValue::Plain(value)
    }
}

impl<T> From<f64> for ItemValue<T> {
    fn from(value: f64) -> Self {
        ItemValue::Plain(PlainTensor::scalar(value))
    }
}

/// Operation set consumed from an MPC tensor implementation.
///
/// Everything a [`crate::CrypTensor`] does is forwarded through this trait,
/// so any secret-sharing engine can sit behind the wrapper. Errors are
/// reported as [`MpcError`] and are not interpreted by callers.
pub trait MpcTensor:
    Clone + Debug + Display + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Kind name wrappers over this implementation are registered under.
    const KIND: &'static str;
    /// Constructor arguments accepted by [`MpcTensor::new`].
    type Args;
    /// Raw share payload.
    type Share: Clone + Debug + PartialEq;

    /// Secret-shares a fresh tensor.
    fn new(args: Self::Args) -> Result<Self, MpcError>;

    /// Wraps existing shares. `precision` falls back to the default encoder
    /// when `None`; `src` must name one of the parties.
    fn from_shares(
        share: Self::Share,
        precision: Option<u32>,
        src: usize,
        ptype: Ptype,
    ) -> Result<Self, MpcError>;

    /// Copy that shares storage with `self` until either side is written.
    fn shallow_copy(&self) -> Self;

    /// Reconstructs and decodes the plaintext, optionally only towards `dst`.
    fn get_plain_text(&self, dst: Option<usize>) -> Result<PlainTensor, MpcError>;

    /// Returns the same value under the requested representation.
    fn to(&self, ptype: Ptype, options: &ConversionOptions) -> Result<Self, MpcError>;

    fn arithmetic(&self) -> Result<Self, MpcError> {
        self.to(Ptype::Arithmetic, &ConversionOptions::default())
    }

    fn binary(&self) -> Result<Self, MpcError> {
        self.to(Ptype::Binary, &ConversionOptions::default())
    }

    /// Reconstructs the raw ring values without downscaling and returns them
    /// as a public tensor.
    fn reveal(&self, dst: Option<usize>) -> Result<Self, MpcError>;

    fn set_item(&mut self, index: &[usize], value: ItemValue<Self>) -> Result<(), MpcError>;

    fn share(&self) -> Self::Share;

    fn set_share(&mut self, share: Self::Share) -> Result<(), MpcError>;

    fn encoder(&self) -> FixedPointEncoder;

    fn set_encoder(&mut self, encoder: FixedPointEncoder);

    fn ptype(&self) -> Ptype;
}

pub mod shared;

pub use shared::{SharedTensor, SharedTensorArgs};
