//! # Genesis Header Table
//!
//! Maps a network id to the header that network's chain starts from.

use std::collections::BTreeMap;

use shared_types::{BlockHeader, Hash, NetworkId};

const MAINNET_STATE_ROOT: Hash = [
    0xd7, 0xf8, 0x97, 0x4f, 0xb5, 0xac, 0x78, 0xd9,
    0xac, 0x09, 0x9b, 0x9a, 0xd5, 0x01, 0x8b, 0xed,
    0xc2, 0xce, 0x0a, 0x72, 0xda, 0xd1, 0x82, 0x7a,
    0x17, 0x09, 0xda, 0x30, 0x58, 0x0f, 0x05, 0x44,
];

const MAINNET_EXTRA_DATA: [u8; 32] = [
    0x11, 0xbb, 0xe8, 0xdb, 0x4e, 0x34, 0x7b, 0x4e,
    0x8c, 0x93, 0x7c, 0x1c, 0x83, 0x70, 0xe4, 0xb5,
    0xed, 0x33, 0xad, 0xb3, 0xdb, 0x69, 0xcb, 0xdb,
    0x7a, 0x38, 0xe1, 0xe5, 0x0b, 0x1b, 0x82, 0xfa,
];

const ROPSTEN_STATE_ROOT: Hash = [
    0x21, 0x7b, 0x0b, 0xbc, 0xfb, 0x72, 0xe2, 0xd5,
    0x7e, 0x28, 0xf3, 0x3c, 0xb3, 0x61, 0xb9, 0x98,
    0x35, 0x13, 0x17, 0x77, 0x55, 0xdc, 0x3f, 0x33,
    0xce, 0x3e, 0x70, 0x22, 0xed, 0x62, 0xb7, 0x7b,
];

/// Nonce shared by the mainnet and Ropsten genesis headers.
const GENESIS_NONCE: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 0x42];

/// Ethereum mainnet genesis header.
pub fn mainnet_genesis_header() -> BlockHeader {
    BlockHeader {
        state_root: MAINNET_STATE_ROOT,
        difficulty: 17_179_869_184,
        gas_limit: 5_000,
        extra_data: MAINNET_EXTRA_DATA.to_vec(),
        nonce: GENESIS_NONCE,
        ..Default::default()
    }
}

/// Ropsten test network genesis header.
pub fn ropsten_genesis_header() -> BlockHeader {
    BlockHeader {
        state_root: ROPSTEN_STATE_ROOT,
        difficulty: 1_048_576,
        gas_limit: 16_777_216,
        extra_data: vec![0x35; 32],
        nonce: GENESIS_NONCE,
        ..Default::default()
    }
}

/// Network id → genesis header, one entry per supported network.
#[derive(Debug, Clone, Default)]
pub struct GenesisHeaderTable {
    headers: BTreeMap<NetworkId, BlockHeader>,
}

impl GenesisHeaderTable {
    /// A table with no supported networks.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A table holding the mainnet and Ropsten genesis headers.
    pub fn with_known_networks() -> Self {
        let mut table = Self::empty();
        table.register(NetworkId::MAINNET, mainnet_genesis_header());
        table.register(NetworkId::ROPSTEN, ropsten_genesis_header());
        table
    }

    /// Add or replace the genesis header of `network`.
    ///
    /// Returns the header previously registered for it.
    pub fn register(&mut self, network: NetworkId, header: BlockHeader) -> Option<BlockHeader> {
        self.headers.insert(network, header)
    }

    /// Genesis header of `network`, if supported.
    pub fn lookup(&self, network: NetworkId) -> Option<&BlockHeader> {
        self.headers.get(&network)
    }

    /// Supported networks in ascending id order.
    pub fn supported_networks(&self) -> Vec<NetworkId> {
        self.headers.keys().copied().collect()
    }
}
