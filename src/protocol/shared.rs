//! In-process reference implementation of [`MpcTensor`].
//!
//! All parties' shares live in one process, so representation changes and
//! reveals reconstruct locally and reshare with fresh zero-sharing masks
//! instead of running an interactive protocol.

use core::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{ConversionOptions, ItemValue, MpcTensor, Ptype};
use crate::{
    encoder::{DEFAULT_PRECISION_BITS, FixedPointEncoder},
    errors::MpcError,
    plain::PlainTensor,
    prss::ZeroSharing,
    shape::Shape,
    shares::Shares,
};

/// Arguments for secret-sharing a fresh [`SharedTensor`].
#[derive(Clone, Debug)]
pub struct SharedTensorArgs {
    pub data: PlainTensor,
    pub parties: usize,
    /// Party whose share absorbs the plaintext.
    pub src: usize,
    pub precision: Option<u32>,
    pub ptype: Ptype,
    /// Seed for the masking randomness; entropy when `None`.
    pub seed: Option<u64>,
}

impl SharedTensorArgs {
    pub fn new(data: PlainTensor, parties: usize) -> Self {
        Self {
            data,
            parties,
            src: 0,
            precision: None,
            ptype: Ptype::Arithmetic,
            seed: None,
        }
    }

    /// Zero tensor of the given shape.
    pub fn zeros(shape: Shape, parties: usize) -> Result<Self, MpcError> {
        Ok(Self::new(PlainTensor::zeros(shape)?, parties))
    }

    pub fn with_src(mut self, src: usize) -> Self {
        self.src = src;
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_ptype(mut self, ptype: Ptype) -> Self {
        self.ptype = ptype;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// A tensor secret-shared among `n` simulated parties over `Z_2^64`.
///
/// Cloning copies the share buffers; [`MpcTensor::shallow_copy`] shares
/// them until one side is written.
#[derive(Debug, Serialize, Deserialize)]
pub struct SharedTensor {
    shares: Arc<Shares>,
    encoder: FixedPointEncoder,
    ptype: Ptype,
}

impl SharedTensor {
    pub fn from_plain(data: PlainTensor, parties: usize) -> Result<Self, MpcError> {
        Self::new(SharedTensorArgs::new(data, parties))
    }

    pub fn shape(&self) -> &Shape {
        self.shares.shape()
    }

    pub fn num_parties(&self) -> usize {
        self.shares.num_parties()
    }

    /// Whether `self` and `other` currently read the same share buffers.
    pub fn shares_storage_with(&self, other: &SharedTensor) -> bool {
        Arc::ptr_eq(&self.shares, &other.shares)
    }

    fn check_party(&self, party: Option<usize>) -> Result<(), MpcError> {
        match party {
            Some(party) if party >= self.num_parties() => Err(MpcError::PartyOutOfRange {
                party,
                parties: self.num_parties(),
            }),
            _ => Ok(()),
        }
    }

    fn reconstruct(&self) -> Vec<u64> {
        match self.ptype {
            Ptype::Arithmetic => self.shares.reconstruct_arithmetic(),
            Ptype::Binary => self.shares.reconstruct_binary(),
        }
    }

    fn write_public(&mut self, start: usize, values: &[u64]) {
        let shares = Arc::make_mut(&mut self.shares);
        for (party, buffer) in shares.parties_mut().iter_mut().enumerate() {
            let dst = &mut buffer.as_mut_slice()[start..start + values.len()];
            if party == 0 {
                dst.copy_from_slice(values);
            } else {
                dst.fill(0);
            }
        }
    }
}

impl Clone for SharedTensor {
    fn clone(&self) -> Self {
        Self {
            shares: Arc::new(Shares::clone(&self.shares)),
            encoder: self.encoder,
            ptype: self.ptype,
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    }
}

/// Masks `values` with a fresh zero sharing and folds them into `src`'s share.
fn share_values<R: RngCore + ?Sized>(
    rng: &mut R,
    shape: Shape,
    values: &[u64],
    parties: usize,
    src: usize,
    ptype: Ptype,
) -> Result<Shares, MpcError> {
    let zero = ZeroSharing::from_rng(rng, parties);
    let mut masks = match ptype {
        Ptype::Arithmetic => zero.arithmetic(values.len()),
        Ptype::Binary => zero.binary(values.len()),
    };
    for (mask, value) in masks[src].iter_mut().zip(values) {
        *mask = match ptype {
            Ptype::Arithmetic => mask.wrapping_add(*value),
            Ptype::Binary => *mask ^ *value,
        };
    }
    trace!(parties, src, elements = values.len(), %ptype, "shared tensor values");
    Shares::new(shape, masks)
}

impl MpcTensor for SharedTensor {
    const KIND: &'static str = "CrypTensor<SharedTensor>";
    type Args = SharedTensorArgs;
    type Share = Shares;

    fn new(args: SharedTensorArgs) -> Result<Self, MpcError> {
        if args.parties < 2 {
            return Err(MpcError::InvalidParties(args.parties));
        }
        if args.src >= args.parties {
            return Err(MpcError::PartyOutOfRange {
                party: args.src,
                parties: args.parties,
            });
        }
        let encoder = FixedPointEncoder::new(args.precision.unwrap_or(DEFAULT_PRECISION_BITS))?;
        let encoded = encoder.encode_all(args.data.data())?;
        let mut rng = seeded_rng(args.seed);
        let shares = share_values(
            &mut rng,
            args.data.shape().clone(),
            &encoded,
            args.parties,
            args.src,
            args.ptype,
        )?;
        Ok(Self {
            shares: Arc::new(shares),
            encoder,
            ptype: args.ptype,
        })
    }

    fn from_shares(
        share: Shares,
        precision: Option<u32>,
        src: usize,
        ptype: Ptype,
    ) -> Result<Self, MpcError> {
        if src >= share.num_parties() {
            return Err(MpcError::PartyOutOfRange {
                party: src,
                parties: share.num_parties(),
            });
        }
        let encoder = FixedPointEncoder::new(precision.unwrap_or(DEFAULT_PRECISION_BITS))?;
        Ok(Self {
            shares: Arc::new(share),
            encoder,
            ptype,
        })
    }

    fn shallow_copy(&self) -> Self {
        Self {
            shares: Arc::clone(&self.shares),
            encoder: self.encoder,
            ptype: self.ptype,
        }
    }

    fn get_plain_text(&self, dst: Option<usize>) -> Result<PlainTensor, MpcError> {
        self.check_party(dst)?;
        debug!(?dst, shape = %self.shape(), "decrypting shared tensor");
        let data = self.encoder.decode_all(&self.reconstruct());
        PlainTensor::new(data, self.shape().clone())
    }

    fn to(&self, ptype: Ptype, options: &ConversionOptions) -> Result<Self, MpcError> {
        if ptype == self.ptype {
            return Ok(self.shallow_copy());
        }
        debug!(from = %self.ptype, to = %ptype, parties = self.num_parties(), "converting shared tensor");
        let raw = self.reconstruct();
        let mut rng = seeded_rng(options.seed);
        let shares = share_values(
            &mut rng,
            self.shape().clone(),
            &raw,
            self.num_parties(),
            0,
            ptype,
        )?;
        Ok(Self {
            shares: Arc::new(shares),
            encoder: self.encoder,
            ptype,
        })
    }

    fn reveal(&self, dst: Option<usize>) -> Result<Self, MpcError> {
        self.check_party(dst)?;
        debug!(?dst, shape = %self.shape(), "revealing shared tensor");
        let raw = self.reconstruct();
        let mut parties = vec![raw];
        parties.resize(self.num_parties(), vec![0; self.shape().numel()]);
        Ok(Self {
            shares: Arc::new(Shares::new(self.shape().clone(), parties)?),
            encoder: FixedPointEncoder::unit(),
            ptype: Ptype::Arithmetic,
        })
    }

    fn set_item(&mut self, index: &[usize], value: ItemValue<Self>) -> Result<(), MpcError> {
        let (range, block) = self.shape().block(index)?;
        match value {
            ItemValue::Plain(plain) => {
                let values = match plain.numel() {
                    1 if block.numel() != 1 => vec![plain.data()[0]; block.numel()],
                    n if n == block.numel() => plain.data().to_vec(),
                    _ => {
                        return Err(MpcError::ShapeMismatch {
                            expected: block.dims().to_vec(),
                            got: plain.shape().dims().to_vec(),
                        });
                    }
                };
                let encoded = self.encoder.encode_all(&values)?;
                self.write_public(range.start, &encoded);
            }
            ItemValue::Shared(other) => {
                if other.num_parties() != self.num_parties() {
                    return Err(MpcError::PartyCountMismatch {
                        expected: self.num_parties(),
                        got: other.num_parties(),
                    });
                }
                if other.encoder != self.encoder {
                    return Err(MpcError::EncoderMismatch {
                        expected: self.encoder.precision_bits(),
                        got: other.encoder.precision_bits(),
                    });
                }
                if other.shape().numel() != block.numel() {
                    return Err(MpcError::ShapeMismatch {
                        expected: block.dims().to_vec(),
                        got: other.shape().dims().to_vec(),
                    });
                }
                let other = other.to(self.ptype, &ConversionOptions::default())?;
                let shares = Arc::make_mut(&mut self.shares);
                for (dst, src) in shares.parties_mut().iter_mut().zip(other.shares.parties()) {
                    dst.as_mut_slice()[range.clone()].copy_from_slice(src.as_slice());
                }
            }
        }
        Ok(())
    }

    fn share(&self) -> Shares {
        Shares::clone(&self.shares)
    }

    fn set_share(&mut self, share: Shares) -> Result<(), MpcError> {
        self.shares = Arc::new(share);
        Ok(())
    }

    fn encoder(&self) -> FixedPointEncoder {
        self.encoder
    }

    fn set_encoder(&mut self, encoder: FixedPointEncoder) {
        self.encoder = encoder;
    }

    fn ptype(&self) -> Ptype {
        self.ptype
    }
}

impl fmt::Display for SharedTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SharedTensor(shape={}, ptype={}, parties={}, precision={})",
            self.shape(),
            self.ptype,
            self.num_parties(),
            self.encoder.precision_bits()
        )
    }
}
