use thiserror::Error;

/// Errors raised by an MPC tensor implementation.
///
/// The wrapper never inspects these; they surface to callers through
/// [`Error::Mpc`] exactly as the backend produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MpcError {
    #[error("need at least two parties, got {0}")]
    InvalidParties(usize),
    #[error("party {party} out of range for {parties} parties")]
    PartyOutOfRange { party: usize, parties: usize },
    #[error("share of party {party} has {got} elements, expected {expected}")]
    ShareLengthMismatch {
        party: usize,
        expected: usize,
        got: usize,
    },
    #[error("party count mismatch: expected {expected}, got {got}")]
    PartyCountMismatch { expected: usize, got: usize },
    #[error("encoder mismatch: expected {expected} precision bits, got {got}")]
    EncoderMismatch { expected: u32, got: u32 },
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("index {index:?} out of bounds for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },
    #[error("precision of {0} bits is not supported")]
    InvalidPrecision(u32),
    #[error("value {value} cannot be encoded with {precision_bits} precision bits")]
    UnencodableValue { value: String, precision_bits: u32 },
    #[error("shape {0:?} has more elements than fit in memory")]
    ShapeOverflow(Vec<usize>),
}

/// Errors surfaced by the wrapper, the hook registry and configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("wrapper holds no MPC tensor")]
    Uninitialized,
    #[error(transparent)]
    Mpc(#[from] MpcError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("tensor kind `{0}` is not registered")]
    UnregisteredTensor(String),
    #[error("malformed class attributes: {0}")]
    Attributes(#[from] serde_json::Error),
    #[error("a hook registry is already installed")]
    RegistryInstalled,
}

pub type Result<T> = std::result::Result<T, Error>;
