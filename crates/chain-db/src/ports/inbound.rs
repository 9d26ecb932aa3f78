//! # Inbound Port (Driving Port)
//!
//! The header-level API of the chain database.

use shared_types::{BlockHeader, Hash};

use crate::domain::errors::ChainDbError;

/// Header store with a canonical head.
///
/// Production: `ChainDb<FileBackedKVStore>` or `ChainDb<RocksDbStore>`
/// Testing: `ChainDb<InMemoryKVStore>`
pub trait ChainDatabase {
    /// Tip of the canonical chain.
    ///
    /// Fails with `ChainDbError::CanonicalHeadNotFound` when the database is
    /// empty; every other error means the database could not be read.
    fn get_canonical_head(&self) -> Result<BlockHeader, ChainDbError>;

    /// Header stored under `hash`.
    fn get_header_by_hash(&self, hash: &Hash) -> Result<BlockHeader, ChainDbError>;

    /// Canonical header hash at `number`.
    fn get_canonical_hash(&self, number: u64) -> Result<Hash, ChainDbError>;

    /// Cumulative difficulty of the chain ending at `hash`.
    fn get_score(&self, hash: &Hash) -> Result<u128, ChainDbError>;

    /// Whether a header with `hash` is stored.
    fn header_exists(&self, hash: &Hash) -> Result<bool, ChainDbError>;

    /// Store a header, moving the canonical head if it is now the heaviest.
    fn persist_header(&mut self, header: &BlockHeader) -> Result<(), ChainDbError>;
}
