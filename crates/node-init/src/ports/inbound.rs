//! # Inbound Ports (Driving Ports)
//!
//! The bootstrap API, in the order a node calls it: inspect the data
//! directory, initialize it if needed, then the same for the database.

use chain_db::ChainDatabase;

use crate::domain::errors::InitError;
use crate::domain::layout::InitConfig;
use crate::domain::report::{DataDirReport, DatabaseStatus};

/// Data directory inspection and initialization.
pub trait DataDirectoryApi {
    /// Whether the layout and node key are all present. Read-only.
    fn is_data_dir_initialized(&self, config: &InitConfig) -> Result<bool, InitError>;

    /// Create whatever is missing. Idempotent.
    fn initialize_data_dir(&self, config: &InitConfig) -> Result<DataDirReport, InitError>;
}

/// Chain database inspection and genesis seeding.
pub trait DatabaseBootstrapApi {
    /// Whether the database has a canonical head.
    ///
    /// Only an empty database yields `Ok(false)`; other failures propagate.
    fn is_database_initialized<D: ChainDatabase>(&self, db: &D) -> Result<bool, InitError>;

    /// Persist the configured network's genesis header if the database is
    /// empty. No-op otherwise.
    fn initialize_database<D: ChainDatabase>(
        &self,
        config: &InitConfig,
        db: &mut D,
    ) -> Result<DatabaseStatus, InitError>;
}
