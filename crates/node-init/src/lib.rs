//! # Node Init
//!
//! Brings a node's data directory, identity key and chain database to a
//! consistent initialized state, or reports why it cannot.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Managed Root | Missing data/log directories are created only under the managed root |
//! | 2 | Key Persistence | An existing key file is never overwritten or regenerated |
//! | 3 | Loud Key Failure | An unreadable key file is an error, not "uninitialized" |
//! | 4 | Empty By Kind | Only `CanonicalHeadNotFound` means the database is empty |
//! | 5 | Exact Genesis | An unsupported network fails; no other network's genesis is used |
//! | 6 | Idempotence | Rerunning any operation on initialized state changes nothing |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Config, managed-root predicate, reports, errors
//! - `ports/` - Bootstrap API (inbound), filesystem and key generation (outbound)
//! - `service.rs` - `NodeInitializer`, the four operations
//! - `bootstrap.rs` - The full sequence
//! - `genesis/` - Genesis header table and builder
//! - `adapters/` - OS and in-memory filesystems, key generators, init lock
//!
//! ## Usage
//!
//! ```ignore
//! use node_init::{InitConfig, NodeInitializer};
//!
//! let config = InitConfig::for_network("/var/lib/quantum-chain", NetworkId::MAINNET);
//! let init = NodeInitializer::with_defaults();
//! let node = init.bootstrap(&config, |dir| {
//!     Ok(ChainDb::new(FileBackedKVStore::open(dir.join("chain.db"))?))
//! })?;
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod bootstrap;
pub mod domain;
pub mod genesis;
pub mod ports;
pub mod service;

pub use adapters::{
    FixedKeyGenerator, InitLock, LockError, MemoryFileSystem, OsFileSystem, RandomKeyGenerator,
};
pub use bootstrap::Bootstrapped;
pub use domain::errors::{InitError, MissingPathKind};
pub use domain::layout::{DataDirectoryLayout, InitConfig, NodeKeySetting};
pub use domain::paths::is_under_path;
pub use domain::report::{BootstrapReport, DataDirReport, DatabaseStatus};
pub use genesis::{GenesisBuilder, GenesisConfig, GenesisError, GenesisHeaderTable};
pub use ports::inbound::{DataDirectoryApi, DatabaseBootstrapApi};
pub use ports::outbound::{FileSystem, KeyGenerator};
pub use service::NodeInitializer;
