//! Wrapper that presents an [`MpcTensor`] through the framework's tensor
//! contract.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    encoder::FixedPointEncoder,
    errors::{Error, Result},
    hook::{AbstractTensor, HookedTensor, TensorId, Worker},
    plain::PlainTensor,
    protocol::{ConversionOptions, ItemValue, MpcTensor, Ptype, SharedTensor},
};

/// Class attributes of a [`CrypTensor`]: just its payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CrypTensorAttributes<T> {
    pub tensor: Option<T>,
}

/// Framework tensor holding at most one MPC tensor.
///
/// Almost every operation forwards to the payload. Conversions and reveals
/// swap the payload as a whole and hand back `&mut Self` for chaining; the
/// copy and factory operations return the raw payload type instead.
/// Operations on an empty wrapper fail with [`Error::Uninitialized`], and
/// backend failures surface unchanged as [`Error::Mpc`].
#[derive(Debug)]
pub struct CrypTensor<T: MpcTensor = SharedTensor> {
    owner: Option<Arc<Worker>>,
    id: TensorId,
    tags: BTreeSet<String>,
    description: Option<String>,
    tensor: Option<T>,
}

impl<T: MpcTensor> CrypTensor<T> {
    pub fn new(tensor: Option<T>) -> Self {
        Self {
            owner: None,
            id: TensorId::random(),
            tags: BTreeSet::new(),
            description: None,
            tensor,
        }
    }

    pub fn owned_by(mut self, owner: Arc<Worker>) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_id(mut self, id: TensorId) -> Self {
        self.id = id;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Current payload, if any.
    pub fn payload(&self) -> Option<&T> {
        self.tensor.as_ref()
    }

    /// Swaps the payload, returning the previous one.
    pub fn replace_payload(&mut self, tensor: Option<T>) -> Option<T> {
        std::mem::replace(&mut self.tensor, tensor)
    }

    /// Representation of the payload; `None` while uninitialized.
    pub fn ptype(&self) -> Option<Ptype> {
        self.tensor.as_ref().map(MpcTensor::ptype)
    }

    fn tensor(&self) -> Result<&T> {
        self.tensor.as_ref().ok_or(Error::Uninitialized)
    }

    /// The wrapper is its own data view.
    pub fn data(&self) -> &Self {
        self
    }

    /// Re-points this wrapper at `other`'s payload without copying shares.
    pub fn set_data(&mut self, other: &CrypTensor<T>) -> &mut Self {
        self.tensor = other.tensor.as_ref().map(T::shallow_copy);
        self
    }

    /// Builds a new raw MPC tensor from constructor arguments.
    ///
    /// Unlike every other operation this returns the payload type, not a
    /// wrapper.
    pub fn new_tensor(args: T::Args) -> Result<T> {
        Ok(T::new(args)?)
    }

    /// Builds a raw MPC tensor from existing shares, honouring the given
    /// precision, source party and representation.
    pub fn from_shares(
        share: T::Share,
        precision: Option<u32>,
        src: usize,
        ptype: Ptype,
    ) -> Result<T> {
        Ok(T::from_shares(share, precision, src, ptype)?)
    }

    pub fn clone_tensor(&self) -> Result<T> {
        Ok(self.tensor()?.clone())
    }

    pub fn shallow_copy(&self) -> Result<T> {
        Ok(self.tensor()?.shallow_copy())
    }

    /// Decrypts the payload.
    pub fn get_plain_text(&self, dst: Option<usize>) -> Result<PlainTensor> {
        Ok(self.tensor()?.get_plain_text(dst)?)
    }

    /// Converts the payload to `ptype`.
    pub fn to(&mut self, ptype: Ptype, options: &ConversionOptions) -> Result<&mut Self> {
        let converted = self.tensor()?.to(ptype, options)?;
        self.tensor = Some(converted);
        Ok(self)
    }

    pub fn arithmetic(&mut self) -> Result<&mut Self> {
        let converted = self.tensor()?.arithmetic()?;
        self.tensor = Some(converted);
        Ok(self)
    }

    pub fn binary(&mut self) -> Result<&mut Self> {
        let converted = self.tensor()?.binary()?;
        self.tensor = Some(converted);
        Ok(self)
    }

    /// Replaces the payload with its revealed form, without downscaling.
    pub fn reveal(&mut self, dst: Option<usize>) -> Result<&mut Self> {
        let revealed = self.tensor()?.reveal(dst)?;
        self.tensor = Some(revealed);
        Ok(self)
    }

    pub fn set_item(&mut self, index: &[usize], value: impl Into<ItemValue<T>>) -> Result<()> {
        let tensor = self.tensor.as_mut().ok_or(Error::Uninitialized)?;
        Ok(tensor.set_item(index, value.into())?)
    }

    pub fn get_share(&self) -> Result<T::Share> {
        Ok(self.tensor()?.share())
    }

    /// Replaces the raw shares. An empty wrapper gets a payload built from
    /// them with default precision.
    pub fn set_share(&mut self, share: T::Share) -> Result<()> {
        let next = match &self.tensor {
            Some(tensor) => {
                let mut next = tensor.shallow_copy();
                next.set_share(share)?;
                next
            }
            None => T::from_shares(share, None, 0, Ptype::Arithmetic)?,
        };
        self.tensor = Some(next);
        Ok(())
    }

    pub fn get_encoder(&self) -> Result<FixedPointEncoder> {
        Ok(self.tensor()?.encoder())
    }

    pub fn set_encoder(&mut self, encoder: FixedPointEncoder) -> Result<()> {
        let tensor = self.tensor.as_mut().ok_or(Error::Uninitialized)?;
        tensor.set_encoder(encoder);
        Ok(())
    }
}

impl<T: MpcTensor> fmt::Display for CrypTensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tensor {
            Some(tensor) => fmt::Display::fmt(tensor, f),
            None => f.write_str("CrypTensor(uninitialized)"),
        }
    }
}

impl<T: MpcTensor> AbstractTensor for CrypTensor<T> {
    fn id(&self) -> TensorId {
        self.id
    }

    fn owner(&self) -> Option<&Arc<Worker>> {
        self.owner.as_ref()
    }

    fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: MpcTensor> HookedTensor for CrypTensor<T> {
    const KIND: &'static str = T::KIND;
    type Attributes = CrypTensorAttributes<T>;

    fn class_attributes(&self) -> CrypTensorAttributes<T> {
        CrypTensorAttributes {
            tensor: self.tensor.as_ref().map(T::shallow_copy),
        }
    }

    fn from_class_attributes(owner: Option<Arc<Worker>>, attributes: CrypTensorAttributes<T>) -> Self {
        let tensor = Self::new(attributes.tensor);
        match owner {
            Some(owner) => tensor.owned_by(owner),
            None => tensor,
        }
    }
}

impl<T: MpcTensor> Default for CrypTensor<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T: MpcTensor> From<T> for CrypTensor<T> {
    fn from(tensor: T) -> Self {
        Self::new(Some(tensor))
    }
}
