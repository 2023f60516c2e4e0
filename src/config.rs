use serde::{Deserialize, Serialize};

use crate::{
    encoder::{DEFAULT_PRECISION_BITS, FixedPointEncoder, MAX_PRECISION_BITS},
    errors::Error,
    plain::PlainTensor,
    protocol::{Ptype, SharedTensorArgs},
};

/// Session-wide parameters for secret-shared tensors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpcConfig {
    pub parties: usize,
    pub precision_bits: u32,
    pub default_ptype: Ptype,
    /// Fixes the masking randomness, for reproducible runs only.
    pub seed: Option<u64>,
}

impl Default for MpcConfig {
    fn default() -> Self {
        Self {
            parties: 2,
            precision_bits: DEFAULT_PRECISION_BITS,
            default_ptype: Ptype::Arithmetic,
            seed: None,
        }
    }
}

impl MpcConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.parties < 2 {
            return Err(Error::InvalidConfig(
                "need at least two parties for secret sharing".into(),
            ));
        }
        if self.precision_bits > MAX_PRECISION_BITS {
            return Err(Error::InvalidConfig(format!(
                "precision must be within [0, {MAX_PRECISION_BITS}] bits"
            )));
        }
        Ok(())
    }

    pub fn encoder(&self) -> Result<FixedPointEncoder, Error> {
        Ok(FixedPointEncoder::new(self.precision_bits)?)
    }

    /// Constructor arguments for sharing `data` under this configuration.
    pub fn tensor_args(&self, data: PlainTensor) -> SharedTensorArgs {
        let args = SharedTensorArgs::new(data, self.parties)
            .with_precision(self.precision_bits)
            .with_ptype(self.default_ptype);
        match self.seed {
            Some(seed) => args.with_seed(seed),
            None => args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MpcConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_single_party() {
        let config = MpcConfig {
            parties: 1,
            ..MpcConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: MpcConfig =
            serde_json::from_str(r#"{ "parties": 3, "default_ptype": "binary" }"#).unwrap();
        assert_eq!(config.parties, 3);
        assert_eq!(config.precision_bits, DEFAULT_PRECISION_BITS);
        assert_eq!(config.default_ptype, Ptype::Binary);
        assert_eq!(config.seed, None);
    }
}
