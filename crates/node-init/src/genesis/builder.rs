//! # Genesis Header Builder
//!
//! Builds and validates genesis headers for networks outside the built-in
//! table (devnets, private chains).

use shared_types::{Address, BlockHeader, Hash, NetworkId, BLANK_ROOT_HASH, ZERO_ADDRESS};
use thiserror::Error;

/// Maximum extra-data length accepted in a header.
pub const MAX_EXTRA_DATA_LEN: usize = 32;

/// Genesis header creation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenesisError {
    /// Invalid genesis configuration.
    #[error("Invalid genesis configuration: {0}")]
    InvalidConfig(String),
}

/// Genesis header configuration.
#[derive(Debug, Clone)]
pub struct GenesisConfig {
    /// Network the header is registered under.
    pub network_id: NetworkId,

    /// Genesis timestamp (Unix seconds). Fixed so the genesis hash is stable.
    pub timestamp: u64,

    /// Starting difficulty; also the genesis score.
    pub difficulty: u64,

    /// Block gas limit.
    pub gas_limit: u64,

    /// State root of the pre-funded allocation.
    pub state_root: Hash,

    /// Reward beneficiary.
    pub coinbase: Address,

    /// Proof-of-work nonce.
    pub nonce: [u8; 8],

    /// Extra data (max 32 bytes).
    pub extra_data: Vec<u8>,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            network_id: NetworkId::MAINNET,
            timestamp: 0,
            difficulty: 1,
            gas_limit: 8_000_000,
            state_root: BLANK_ROOT_HASH,
            coinbase: ZERO_ADDRESS,
            nonce: [0u8; 8],
            extra_data: b"Quantum-Chain Genesis".to_vec(),
        }
    }
}

impl GenesisConfig {
    /// Network id used by the devnet preset.
    pub const DEVNET_NETWORK_ID: NetworkId = NetworkId(1337);

    /// Create a local devnet configuration with an empty state.
    pub fn devnet() -> Self {
        Self {
            network_id: Self::DEVNET_NETWORK_ID,
            gas_limit: 30_000_000,
            extra_data: b"Quantum-Chain Devnet".to_vec(),
            ..Default::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), GenesisError> {
        if self.extra_data.len() > MAX_EXTRA_DATA_LEN {
            return Err(GenesisError::InvalidConfig(format!(
                "Extra data exceeds {} bytes",
                MAX_EXTRA_DATA_LEN
            )));
        }

        if self.difficulty == 0 {
            return Err(GenesisError::InvalidConfig(
                "Difficulty must be non-zero".to_string(),
            ));
        }

        if self.gas_limit == 0 {
            return Err(GenesisError::InvalidConfig(
                "Gas limit must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for genesis headers.
pub struct GenesisBuilder {
    config: GenesisConfig,
}

impl GenesisBuilder {
    /// Create a new genesis builder with configuration.
    pub fn new(config: GenesisConfig) -> Self {
        Self { config }
    }

    /// Network the built header belongs to.
    pub fn network_id(&self) -> NetworkId {
        self.config.network_id
    }

    /// Build the genesis header.
    pub fn build(self) -> Result<BlockHeader, GenesisError> {
        self.config.validate()?;

        Ok(BlockHeader {
            coinbase: self.config.coinbase,
            state_root: self.config.state_root,
            difficulty: self.config.difficulty,
            gas_limit: self.config.gas_limit,
            timestamp: self.config.timestamp,
            extra_data: self.config.extra_data,
            nonce: self.config.nonce,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_devnet_header_is_genesis() {
        let builder = GenesisBuilder::new(GenesisConfig::devnet());
        assert_eq!(builder.network_id(), NetworkId(1337));

        let header = builder.build().unwrap();
        assert!(header.is_genesis());
        assert_eq!(header.gas_limit, 30_000_000);
        assert_eq!(header.extra_data, b"Quantum-Chain Devnet".to_vec());
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = GenesisBuilder::new(GenesisConfig::devnet()).build().unwrap();
        let second = GenesisBuilder::new(GenesisConfig::devnet()).build().unwrap();
        assert_eq!(first.hash(), second.hash());
    }

    #[test]
    fn test_rejects_long_extra_data() {
        let config = GenesisConfig {
            extra_data: vec![0u8; 33],
            ..Default::default()
        };
        assert!(matches!(
            GenesisBuilder::new(config).build(),
            Err(GenesisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_difficulty() {
        let config = GenesisConfig {
            difficulty: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_gas_limit() {
        let config = GenesisConfig {
            gas_limit: 0,
            ..GenesisConfig::devnet()
        };
        assert!(config.validate().is_err());
    }
}
