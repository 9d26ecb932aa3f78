//! # Node Runtime
//!
//! ## Startup Sequence
//!
//! 1. Create the managed root and take the init lock in it (and in an
//!    existing custom data directory outside the root)
//! 2. Verify or initialize the data directory and node key
//! 3. Open the chain database inside the database directory
//! 4. Seed the genesis header if the database is empty
//! 5. Release the locks and hand the database to the caller

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chain_db::{ChainDb, ChainDbError};
use node_init::domain::paths::normalize;
use node_init::{
    is_under_path, BootstrapReport, InitConfig, InitLock, NodeInitializer, OsFileSystem,
    RandomKeyGenerator,
};
use tracing::info;

use crate::config::NodeConfig;

#[cfg(not(feature = "rocksdb"))]
pub use chain_db::FileBackedKVStore as NodeStore;
#[cfg(feature = "rocksdb")]
pub use chain_db::RocksDbStore as NodeStore;

/// File name of the file-backed store inside the database directory.
pub const CHAIN_DB_FILE: &str = "chain.db";

/// Open the node's chain database in `database_dir`.
#[cfg(not(feature = "rocksdb"))]
pub fn open_chain_db(database_dir: &Path) -> Result<ChainDb<NodeStore>, ChainDbError> {
    Ok(ChainDb::new(NodeStore::open(database_dir.join(CHAIN_DB_FILE))?))
}

/// Open the node's chain database in `database_dir`.
#[cfg(feature = "rocksdb")]
pub fn open_chain_db(database_dir: &Path) -> Result<ChainDb<NodeStore>, ChainDbError> {
    Ok(ChainDb::new(NodeStore::open_default(database_dir)?))
}

/// A bootstrapped node.
pub struct StartedNode {
    pub db: ChainDb<NodeStore>,
    pub report: BootstrapReport,
    /// Log file created by the bootstrap, ready to be attached to logging.
    pub log_file: PathBuf,
}

/// The node runtime.
pub struct NodeRuntime {
    config: NodeConfig,
}

impl NodeRuntime {
    pub fn new(config: NodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Run the startup sequence.
    pub fn start(&self) -> Result<StartedNode> {
        info!("===========================================");
        info!("  Quantum-Chain Node Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let init_config = self.config.init_config();
        let locks = self.acquire_locks(&init_config)?;

        let genesis = self
            .config
            .genesis_table()
            .context("Failed to build genesis table")?;
        let initializer = NodeInitializer::new(OsFileSystem, RandomKeyGenerator, genesis);

        let node = initializer
            .bootstrap(&init_config, open_chain_db)
            .context("Node bootstrap failed")?;
        drop(locks);

        info!(
            network = %self.config.network_id,
            data_dir = %init_config.layout.data_dir.display(),
            log_file = %init_config.layout.log_file.display(),
            "Node initialized"
        );

        Ok(StartedNode {
            db: node.db,
            report: node.report,
            log_file: init_config.layout.log_file,
        })
    }

    /// Lock the root, and an existing data dir outside it.
    ///
    /// Nodes with different roots can share a custom data dir; the second
    /// lock keeps them from bootstrapping it together. A missing custom data
    /// dir needs no lock since bootstrap refuses to create it.
    fn acquire_locks(&self, init_config: &InitConfig) -> Result<Vec<InitLock>> {
        let root = &self.config.root_dir;
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create root directory {}", root.display()))?;

        let mut locks =
            vec![InitLock::acquire(root).context("Another node is initializing this root")?];

        let data_dir = &init_config.layout.data_dir;
        let outside_root = !is_under_path(root, data_dir) && normalize(root) != normalize(data_dir);
        if outside_root && data_dir.is_dir() {
            locks.push(
                InitLock::acquire(data_dir)
                    .context("Another node is initializing this data directory")?,
            );
        }

        Ok(locks)
    }
}
