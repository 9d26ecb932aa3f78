//! # Storage Key Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `h:{hash}` | bincode `BlockHeader` |
//! | `s:{hash}` | score (cumulative difficulty), u128 big-endian |
//! | `n:{number}` | canonical hash at that height |
//! | `m:canonical-head` | hash of the canonical head |

use shared_types::Hash;

/// Key namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Header by hash.
    Header,
    /// Score by hash.
    Score,
    /// Canonical hash by block number.
    CanonicalByNumber,
    /// Chain metadata.
    Metadata,
}

impl KeyPrefix {
    /// Get the byte prefix for this key type.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Header => b"h:",
            KeyPrefix::Score => b"s:",
            KeyPrefix::CanonicalByNumber => b"n:",
            KeyPrefix::Metadata => b"m:",
        }
    }

    /// Build a full key with the given suffix.
    pub fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(suffix);
        key
    }

    /// Header key for a hash.
    pub fn header_key(hash: &Hash) -> Vec<u8> {
        KeyPrefix::Header.key(hash)
    }

    /// Score key for a hash.
    pub fn score_key(hash: &Hash) -> Vec<u8> {
        KeyPrefix::Score.key(hash)
    }

    /// Canonical index key for a block number.
    pub fn canonical_key(number: u64) -> Vec<u8> {
        KeyPrefix::CanonicalByNumber.key(&number.to_be_bytes())
    }

    /// Key holding the canonical head hash.
    pub fn canonical_head_key() -> Vec<u8> {
        KeyPrefix::Metadata.key(b"canonical-head")
    }
}
