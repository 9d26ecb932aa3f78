//! # Network Identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of a chain network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetworkId(pub u64);

impl NetworkId {
    /// Ethereum main network.
    pub const MAINNET: NetworkId = NetworkId(1);

    /// Ropsten proof-of-work test network.
    pub const ROPSTEN: NetworkId = NetworkId(3);

    /// Human-readable name for well-known networks.
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            NetworkId::MAINNET => Some("mainnet"),
            NetworkId::ROPSTEN => Some("ropsten"),
            _ => None,
        }
    }

    /// Directory-safe label: the well-known name, or `network-<id>`.
    pub fn dir_name(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => format!("network-{}", self.0),
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}

impl From<u64> for NetworkId {
    fn from(id: u64) -> Self {
        NetworkId(id)
    }
}
