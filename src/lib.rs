//! Secret-shared tensors behind a framework tensor-wrapping protocol.
//!
//! The crate is split into three layers:
//!
//! - **`crypten`**: [`CrypTensor`], a thin wrapper that gives an MPC tensor
//!   the identity, tags and dispatch hooks every framework tensor has, and
//!   forwards the MPC operations (reveal, representation changes, share and
//!   encoder access) to its payload.
//! - **`protocol`**: the [`MpcTensor`] trait the wrapper consumes, plus
//!   [`SharedTensor`], an in-process reference implementation using additive
//!   and XOR sharing over `Z_2^64`.
//! - **`hook`**: the [`HookRegistry`] that lets dispatch rebuild wrappers from
//!   their class attributes. It is installed explicitly at start-up.
//!
//! ## Quick Example
//!
//! ```rust
//! use cryptensor::{CrypTensor, MpcTensor, PlainTensor, SharedTensor, SharedTensorArgs};
//!
//! let shared = SharedTensor::new(SharedTensorArgs::new(PlainTensor::scalar(42.0), 2))?;
//! let mut wrapper = CrypTensor::from(shared);
//! assert_eq!(wrapper.get_plain_text(None)?.item(), Some(42.0));
//!
//! wrapper.binary()?;
//! assert_eq!(wrapper.get_plain_text(None)?.item(), Some(42.0));
//! # Ok::<(), cryptensor::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`parallel`** (default): reconstruct shares with Rayon.
//! - **`tracing-subscriber`** (default): enables [`init_tracing`].

pub mod config;
pub mod crypten;
pub mod encoder;
pub mod errors;
pub mod hook;
pub mod plain;
pub mod protocol;
pub mod prss;
pub mod shape;
pub mod shares;

pub use config::*;
pub use crypten::*;
pub use encoder::*;
pub use errors::*;
pub use hook::{AbstractTensor, HookRegistry, HookedTensor, TensorId, Worker, WrappedResponse};
pub use plain::*;
pub use protocol::*;
pub use shape::*;
pub use shares::*;

/// Installs a formatting subscriber at `level`. Does nothing if a global
/// subscriber is already set.
#[cfg(feature = "tracing-subscriber")]
pub fn init_tracing(level: tracing::Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
