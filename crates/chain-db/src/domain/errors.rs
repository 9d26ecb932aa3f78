//! # Domain Errors
//!
//! ## Design Principles
//!
//! - An empty database is a distinct variant (`CanonicalHeadNotFound`) so
//!   callers branch on it by kind, not by message text
//! - Store failures keep their own type and convert with `?`

use shared_types::Hash;
use thiserror::Error;

/// Errors from the underlying key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Persisted data could not be decoded.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

/// Errors that can occur during chain database operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainDbError {
    /// No canonical head has been recorded: the database is empty.
    #[error("No canonical head set for this chain")]
    CanonicalHeadNotFound,

    /// No header stored under this hash.
    #[error("Header not found: 0x{}", hex::encode(.hash))]
    HeaderNotFound { hash: Hash },

    /// No canonical header at this height.
    #[error("No canonical header at height {number}")]
    CanonicalHashNotFound { number: u64 },

    /// Parent of a non-genesis header is unknown (INVARIANT-1).
    #[error("Parent 0x{} of header #{number} not found", hex::encode(.parent_hash))]
    ParentNotFound { number: u64, parent_hash: Hash },

    /// Key-value store failure.
    #[error(transparent)]
    Store(#[from] KVStoreError),

    /// Stored value could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_not_found_shows_hash() {
        let err = ChainDbError::HeaderNotFound { hash: [0xabu8; 32] };
        assert!(err.to_string().contains("0xabab"));
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err: ChainDbError = KVStoreError::IOError {
            message: "disk gone".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "KV store I/O error: disk gone");
    }
}
