//! # Bootstrap Sequence
//!
//! Runs the four operations in order:
//!
//! ```text
//! is_data_dir_initialized ──false──► initialize_data_dir
//!            │                               │
//!            ▼                               ▼
//!        open database (only once its directory exists)
//!            │
//! is_database_initialized ──false──► initialize_database
//! ```
//!
//! Any failure aborts the sequence. Steps already completed stay done and a
//! rerun picks up where it stopped.

use std::path::Path;

use chain_db::{ChainDatabase, ChainDbError};
use tracing::info;

use crate::domain::errors::{InitError, MissingPathKind};
use crate::domain::layout::InitConfig;
use crate::domain::report::{BootstrapReport, DatabaseStatus};
use crate::ports::inbound::{DataDirectoryApi, DatabaseBootstrapApi};
use crate::ports::outbound::{FileSystem, KeyGenerator};
use crate::service::NodeInitializer;

/// A bootstrapped node's database together with what the run did.
pub struct Bootstrapped<D> {
    pub db: D,
    pub report: BootstrapReport,
}

impl<F: FileSystem, K: KeyGenerator> NodeInitializer<F, K> {
    /// Bring the data directory and chain database to the initialized state.
    ///
    /// `open_db` receives the database directory and is called only after the
    /// directory has been verified or created.
    pub fn bootstrap<D, O>(&self, config: &InitConfig, open_db: O) -> Result<Bootstrapped<D>, InitError>
    where
        D: ChainDatabase,
        O: FnOnce(&Path) -> Result<D, ChainDbError>,
    {
        info!(
            network_id = config.network_id.0,
            data_dir = %config.layout.data_dir.display(),
            "Bootstrapping node"
        );

        let data_dir = if self.is_data_dir_initialized(config)? {
            info!("Data directory already initialized");
            None
        } else {
            Some(self.initialize_data_dir(config)?)
        };

        let node_key = self
            .resolve_node_key(config)?
            .ok_or_else(|| InitError::MissingPath {
                path: config
                    .node_key
                    .key_path()
                    .map(Path::to_path_buf)
                    .unwrap_or_default(),
                kind: MissingPathKind::NodeKey,
            })?;

        let mut db = open_db(config.layout.database_dir.as_path())?;

        let database = if self.is_database_initialized(&db)? {
            DatabaseStatus::AlreadyInitialized
        } else {
            self.initialize_database(config, &mut db)?
        };

        let head = db.get_canonical_head()?;
        let report = BootstrapReport {
            network_id: config.network_id,
            data_dir,
            database,
            node_id: node_key.node_id(),
            head_hash: head.hash(),
            head_number: head.block_number,
        };

        info!(
            node_id = %hex::encode(report.node_id),
            head_number = report.head_number,
            head_hash = %hex::encode(report.head_hash),
            genesis_seeded = report.genesis_seeded(),
            "Node bootstrap complete"
        );

        Ok(Bootstrapped { db, report })
    }
}
