//! # Shared Types Crate
//!
//! Chain entities used across the node bootstrap workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `BlockHeader` and `NetworkId` are defined once
//!   and shared by the chain database, the bootstrap core and the runtime.
//! - **Canonical Identity**: a header's hash is Keccak-256 over its RLP
//!   encoding, so hard-coded genesis headers hash to their well-known values.

pub mod entities;
pub mod network;

pub use entities::*;
pub use network::NetworkId;
