//! # Core Chain Entities
//!
//! ## Clusters
//!
//! - **Primitives**: `Hash`, `Address`, `Bloom`
//! - **Chain**: `BlockHeader`

use rlp::RlpStream;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha3::{Digest, Keccak256};

/// A 32-byte Keccak-256 hash.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// A 2048-bit log bloom.
pub type Bloom = [u8; 256];

/// 32 zero bytes (parent of genesis, empty mix hash).
pub const ZERO_HASH: Hash = [0u8; 32];

/// 20 zero bytes.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// Root of an empty trie: Keccak-256 of RLP("").
pub const BLANK_ROOT_HASH: Hash = [
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6,
    0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8, 0x6e,
    0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0,
    0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63, 0xb4, 0x21,
];

/// Hash of an empty uncle list: Keccak-256 of RLP([]).
pub const EMPTY_UNCLE_HASH: Hash = [
    0x1d, 0xcc, 0x4d, 0xe8, 0xde, 0xc7, 0x5d, 0x7a,
    0xab, 0x85, 0xb5, 0x67, 0xb6, 0xcc, 0xd4, 0x1a,
    0xd3, 0x12, 0x45, 0x1b, 0x94, 0x8a, 0x74, 0x13,
    0xf0, 0xa1, 0x42, 0xfd, 0x40, 0xd4, 0x93, 0x47,
];

/// Number of RLP list items in an encoded header.
const HEADER_FIELD_COUNT: usize = 15;

/// The header of a block.
///
/// Field order matches the RLP encoding order.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Hash of the parent header.
    pub parent_hash: Hash,
    /// Hash of the uncle list.
    pub uncles_hash: Hash,
    /// Beneficiary of the block reward.
    pub coinbase: Address,
    /// State trie root after applying this block.
    pub state_root: Hash,
    /// Transaction trie root.
    pub transaction_root: Hash,
    /// Receipt trie root.
    pub receipt_root: Hash,
    /// Log bloom of all receipts.
    #[serde_as(as = "Bytes")]
    pub bloom: Bloom,
    /// Proof-of-work difficulty.
    pub difficulty: u64,
    /// Height of this block (0 for genesis).
    pub block_number: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Gas used.
    pub gas_used: u64,
    /// Unix timestamp.
    pub timestamp: u64,
    /// Arbitrary extra data (at most 32 bytes).
    pub extra_data: Vec<u8>,
    /// Proof-of-work mix hash.
    pub mix_hash: Hash,
    /// Proof-of-work nonce.
    pub nonce: [u8; 8],
}

impl BlockHeader {
    /// RLP encoding of the header.
    pub fn rlp_bytes(&self) -> Vec<u8> {
        let mut stream = RlpStream::new_list(HEADER_FIELD_COUNT);
        stream
            .append(&self.parent_hash.to_vec())
            .append(&self.uncles_hash.to_vec())
            .append(&self.coinbase.to_vec())
            .append(&self.state_root.to_vec())
            .append(&self.transaction_root.to_vec())
            .append(&self.receipt_root.to_vec())
            .append(&self.bloom.to_vec())
            .append(&self.difficulty)
            .append(&self.block_number)
            .append(&self.gas_limit)
            .append(&self.gas_used)
            .append(&self.timestamp)
            .append(&self.extra_data)
            .append(&self.mix_hash.to_vec())
            .append(&self.nonce.to_vec());
        stream.out().to_vec()
    }

    /// Keccak-256 of the RLP encoding.
    pub fn hash(&self) -> Hash {
        Keccak256::digest(self.rlp_bytes()).into()
    }

    /// Whether this is a chain's first header.
    pub fn is_genesis(&self) -> bool {
        self.block_number == 0 && self.parent_hash == ZERO_HASH
    }
}

impl Default for BlockHeader {
    fn default() -> Self {
        Self {
            parent_hash: ZERO_HASH,
            uncles_hash: EMPTY_UNCLE_HASH,
            coinbase: ZERO_ADDRESS,
            state_root: BLANK_ROOT_HASH,
            transaction_root: BLANK_ROOT_HASH,
            receipt_root: BLANK_ROOT_HASH,
            bloom: [0u8; 256],
            difficulty: 0,
            block_number: 0,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            extra_data: Vec::new(),
            mix_hash: ZERO_HASH,
            nonce: [0u8; 8],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_constants_match_keccak() {
        // RLP("") = 0x80, RLP([]) = 0xc0
        let blank: Hash = Keccak256::digest([0x80u8]).into();
        let uncles: Hash = Keccak256::digest([0xc0u8]).into();
        assert_eq!(blank, BLANK_ROOT_HASH);
        assert_eq!(uncles, EMPTY_UNCLE_HASH);
    }

    #[test]
    fn test_default_header_is_genesis() {
        assert!(BlockHeader::default().is_genesis());
    }

    #[test]
    fn test_child_header_is_not_genesis() {
        let parent = BlockHeader::default();
        let child = BlockHeader {
            parent_hash: parent.hash(),
            block_number: 1,
            ..Default::default()
        };
        assert!(!child.is_genesis());
    }

    #[test]
    fn test_hash_depends_on_extra_data() {
        let a = BlockHeader::default();
        let b = BlockHeader {
            extra_data: b"different".to_vec(),
            ..Default::default()
        };
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_rlp_list_prefix() {
        // 15 fields with a 256-byte bloom: payload > 55 bytes, long list form
        let encoded = BlockHeader::default().rlp_bytes();
        assert_eq!(encoded[0], 0xf9);
    }

    #[test]
    fn test_bincode_keeps_bloom() {
        let mut header = BlockHeader::default();
        header.bloom[255] = 0x01;
        let bytes = bincode::serialize(&header).unwrap();
        let decoded: BlockHeader = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded.bloom[255], 0x01);
        assert_eq!(hex::encode(decoded.hash()), hex::encode(header.hash()));
    }
}
