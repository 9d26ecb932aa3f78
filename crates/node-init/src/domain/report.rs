//! # Bootstrap Reports
//!
//! What each operation did, for logging by the caller.

use std::path::PathBuf;

use shared_types::{Hash, NetworkId};

/// Resources created by `initialize_data_dir`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataDirReport {
    pub created_dirs: Vec<PathBuf>,
    pub created_files: Vec<PathBuf>,
    /// Whether a new node key was generated and written.
    pub key_generated: bool,
}

impl DataDirReport {
    /// Whether nothing had to be created.
    pub fn is_noop(&self) -> bool {
        self.created_dirs.is_empty() && self.created_files.is_empty() && !self.key_generated
    }
}

/// Outcome of `initialize_database`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseStatus {
    /// A canonical head already existed; nothing was written.
    AlreadyInitialized,
    /// The database was empty and the genesis header was persisted.
    SeededGenesis { genesis_hash: Hash },
}

/// Summary of a full bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub network_id: NetworkId,
    /// `None` when the data directory was already initialized.
    pub data_dir: Option<DataDirReport>,
    pub database: DatabaseStatus,
    pub node_id: [u8; 32],
    pub head_hash: Hash,
    pub head_number: u64,
}

impl BootstrapReport {
    /// Whether genesis was written during this run.
    pub fn genesis_seeded(&self) -> bool {
        matches!(self.database, DatabaseStatus::SeededGenesis { .. })
    }
}
