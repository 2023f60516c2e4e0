//! Framework-side tensor contract and the registry that lets dispatch rebuild
//! wrappers from their class attributes.
//!
//! Registration is explicit: build a [`HookRegistry`], register the wrapper
//! kinds the process needs, then [`install`] it once during start-up.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Debug};
use std::sync::{Arc, OnceLock};

use rand::RngCore;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    crypten::CrypTensor,
    errors::{Error, Result},
    protocol::SharedTensor,
};

/// Execution context that owns tensors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
}

impl Worker {
    pub fn new(id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { id: id.into() })
    }
}

/// Framework-wide object identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TensorId(pub u64);

impl TensorId {
    pub fn random() -> Self {
        Self(rand::thread_rng().next_u64())
    }
}

impl fmt::Display for TensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bookkeeping every framework tensor carries, whatever its payload.
pub trait AbstractTensor: Debug + Send + Sync + 'static {
    fn id(&self) -> TensorId;
    fn owner(&self) -> Option<&Arc<Worker>>;
    fn tags(&self) -> &BTreeSet<String>;
    fn description(&self) -> Option<&str>;
    /// Name the tensor kind is registered under.
    fn kind(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
}

/// A tensor kind the framework can rebuild from its class attributes.
pub trait HookedTensor: AbstractTensor + Sized {
    const KIND: &'static str;
    type Attributes: Serialize + DeserializeOwned;

    /// Minimal state needed to rebuild an equivalent tensor elsewhere.
    fn class_attributes(&self) -> Self::Attributes;

    fn from_class_attributes(owner: Option<Arc<Worker>>, attributes: Self::Attributes) -> Self;
}

type RebuildFn =
    dyn Fn(Option<Arc<Worker>>, serde_json::Value) -> Result<Box<dyn AbstractTensor>> + Send + Sync;

/// Known tensor kinds and how to rebuild each from serialized attributes.
#[derive(Default)]
pub struct HookRegistry {
    entries: BTreeMap<&'static str, Box<RebuildFn>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the crate's own wrapper kinds registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<CrypTensor<SharedTensor>>();
        registry
    }

    /// Registers `T`; returns `false` when the kind was already known.
    pub fn register<T: HookedTensor>(&mut self) -> bool {
        if self.entries.contains_key(T::KIND) {
            return false;
        }
        debug!(kind = T::KIND, "registering tensor kind");
        self.entries.insert(
            T::KIND,
            Box::new(
                |owner: Option<Arc<Worker>>,
                 value: serde_json::Value|
                 -> Result<Box<dyn AbstractTensor>> {
                    let attributes = serde_json::from_value::<T::Attributes>(value)?;
                    Ok(Box::new(T::from_class_attributes(owner, attributes)))
                },
            ),
        );
        true
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Rebuilds a tensor of `kind` from JSON-encoded class attributes.
    pub fn rebuild(
        &self,
        kind: &str,
        owner: Option<Arc<Worker>>,
        attributes: serde_json::Value,
    ) -> Result<Box<dyn AbstractTensor>> {
        let rebuild = self
            .entries
            .get(kind)
            .ok_or_else(|| Error::UnregisteredTensor(kind.to_owned()))?;
        rebuild(owner, attributes)
    }

    /// Wraps a response back into `T`, provided `T` has been registered.
    pub fn wrap_response<T: HookedTensor>(
        &self,
        owner: Option<Arc<Worker>>,
        attributes: T::Attributes,
    ) -> Result<T> {
        if !self.is_registered(T::KIND) {
            return Err(Error::UnregisteredTensor(T::KIND.to_owned()));
        }
        Ok(T::from_class_attributes(owner, attributes))
    }
}

impl Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

static REGISTRY: OnceLock<HookRegistry> = OnceLock::new();

/// Installs the process-wide registry. Fails if one is already in place.
pub fn install(registry: HookRegistry) -> Result<&'static HookRegistry> {
    REGISTRY
        .set(registry)
        .map_err(|_| Error::RegistryInstalled)?;
    REGISTRY.get().ok_or(Error::RegistryInstalled)
}

/// The installed registry, falling back to [`HookRegistry::with_defaults`]
/// when nothing was installed.
pub fn registry() -> &'static HookRegistry {
    REGISTRY.get_or_init(HookRegistry::with_defaults)
}

/// Serialized form of a tensor's class attributes, as carried between workers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WrappedResponse {
    pub kind: String,
    pub attributes: serde_json::Value,
}

impl WrappedResponse {
    pub fn from_tensor<T: HookedTensor>(tensor: &T) -> Result<Self> {
        Ok(Self {
            kind: T::KIND.to_owned(),
            attributes: serde_json::to_value(tensor.class_attributes())?,
        })
    }

    pub fn rebuild(
        self,
        registry: &HookRegistry,
        owner: Option<Arc<Worker>>,
    ) -> Result<Box<dyn AbstractTensor>> {
        registry.rebuild(&self.kind, owner, self.attributes)
    }
}
