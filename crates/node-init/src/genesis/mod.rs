//! # Genesis Module
//!
//! The genesis header table consulted when seeding an empty chain database,
//! and a builder for headers of custom networks.

pub mod builder;
pub mod table;

pub use builder::{GenesisBuilder, GenesisConfig, GenesisError, MAX_EXTRA_DATA_LEN};
pub use table::{mainnet_genesis_header, ropsten_genesis_header, GenesisHeaderTable};
