//! # Chain Database
//!
//! Persists block headers and tracks the canonical chain head.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Linked Headers | A non-genesis header is only stored if its parent exists |
//! | 2 | Heaviest Head | The canonical head moves only to a strictly higher score |
//! | 3 | Atomic Writes | A header, its score and index updates land in one batch |
//! | 4 | Distinguished Empty | An empty database reports `CanonicalHeadNotFound`, never a generic error |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Errors and storage key layout
//! - `ports/` - `ChainDatabase` (inbound) and `KeyValueStore` (outbound)
//! - `service.rs` - `ChainDb`, the header store over any `KeyValueStore`
//! - `adapters/` - File-backed and RocksDB stores
//!
//! ## Usage
//!
//! ```ignore
//! use chain_db::{ChainDatabase, ChainDb, InMemoryKVStore};
//!
//! let mut db = ChainDb::new(InMemoryKVStore::new());
//! db.persist_header(&genesis)?;
//! let head = db.get_canonical_head()?;
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::FileBackedKVStore;
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbStore};
pub use domain::errors::{ChainDbError, KVStoreError};
pub use domain::keys::KeyPrefix;
pub use ports::inbound::ChainDatabase;
pub use ports::outbound::{BatchOperation, InMemoryKVStore, KeyValueStore};
pub use service::ChainDb;
