//! # Shared Crypto
//!
//! Key primitives for node identity.
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `node_key` | secp256k1 | Node identity key generation and persistence |
//!
//! ## Security Properties
//!
//! - Keys are generated from the OS-seeded thread RNG
//! - Serialized key bytes are returned in a `Zeroizing` wrapper
//! - `Debug` output shows the derived node id, never the secret

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod node_key;

pub use errors::CryptoError;
pub use node_key::{NodeKey, NodePublicKey, NODE_KEY_LENGTH};
