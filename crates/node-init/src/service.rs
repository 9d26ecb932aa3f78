//! # Node Initializer Service
//!
//! Implements the bootstrap API over a `FileSystem` and a `KeyGenerator`.
//!
//! ## Managed Root Policy
//!
//! A missing data or log directory is created only when it lies under the
//! configured managed root. Anywhere else it is a `MissingPath` error and
//! nothing is created. The database directory is always created.
//!
//! ## Node Key
//!
//! A key file that exists is never overwritten. If it cannot be decoded the
//! error propagates instead of a new key being generated.

use std::path::Path;

use chain_db::{ChainDatabase, ChainDbError};
use shared_crypto::NodeKey;
use tracing::{debug, info};

use crate::adapters::{OsFileSystem, RandomKeyGenerator};
use crate::domain::errors::{InitError, MissingPathKind};
use crate::domain::layout::{InitConfig, NodeKeySetting};
use crate::domain::paths::is_under_path;
use crate::domain::report::{DataDirReport, DatabaseStatus};
use crate::genesis::GenesisHeaderTable;
use crate::ports::inbound::{DataDirectoryApi, DatabaseBootstrapApi};
use crate::ports::outbound::{FileSystem, KeyGenerator};

/// Node bootstrap service.
pub struct NodeInitializer<F: FileSystem, K: KeyGenerator> {
    fs: F,
    keygen: K,
    genesis: GenesisHeaderTable,
}

impl NodeInitializer<OsFileSystem, RandomKeyGenerator> {
    /// Real filesystem, random keys, mainnet and Ropsten genesis.
    pub fn with_defaults() -> Self {
        Self::new(
            OsFileSystem,
            RandomKeyGenerator,
            GenesisHeaderTable::with_known_networks(),
        )
    }
}

impl<F: FileSystem, K: KeyGenerator> NodeInitializer<F, K> {
    pub fn new(fs: F, keygen: K, genesis: GenesisHeaderTable) -> Self {
        Self {
            fs,
            keygen,
            genesis,
        }
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    pub fn key_generator(&self) -> &K {
        &self.keygen
    }

    pub fn genesis_table(&self) -> &GenesisHeaderTable {
        &self.genesis
    }

    /// The node key from memory or the key file.
    ///
    /// `Ok(None)` only when a key file is configured and absent.
    pub fn resolve_node_key(&self, config: &InitConfig) -> Result<Option<NodeKey>, InitError> {
        match &config.node_key {
            NodeKeySetting::Supplied(key) => Ok(Some(key.clone())),
            NodeKeySetting::File(path) => {
                if !self.fs.exists(path) {
                    return Ok(None);
                }
                let bytes = zeroize::Zeroizing::new(
                    self.fs.read(path).map_err(|e| InitError::io(path, e))?,
                );
                NodeKey::from_bytes(&bytes)
                    .map(Some)
                    .map_err(|source| InitError::InvalidNodeKey {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }

    /// Create a missing directory if it is under the managed root.
    ///
    /// Returns whether it was created.
    fn ensure_managed_dir(
        &self,
        config: &InitConfig,
        dir: &Path,
        kind: MissingPathKind,
    ) -> Result<bool, InitError> {
        if self.fs.exists(dir) {
            return Ok(false);
        }
        if !is_under_path(&config.managed_root, dir) {
            return Err(InitError::MissingPath {
                path: dir.to_path_buf(),
                kind,
            });
        }
        self.fs
            .create_dir_all(dir)
            .map_err(|e| InitError::io(dir, e))?;
        info!(path = %dir.display(), "Created {}", kind);
        Ok(true)
    }

    /// Generate and write a key unless one is configured or on disk.
    fn ensure_node_key(
        &self,
        config: &InitConfig,
        report: &mut DataDirReport,
    ) -> Result<(), InitError> {
        let path = match &config.node_key {
            NodeKeySetting::Supplied(_) => return Ok(()),
            NodeKeySetting::File(path) => path,
        };

        if self.resolve_node_key(config)?.is_some() {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty()
                && !self.fs.exists(parent)
                && self.ensure_managed_dir(config, parent, MissingPathKind::NodeKey)?
            {
                report.created_dirs.push(parent.to_path_buf());
            }
        }

        let key = self.keygen.generate();
        self.fs
            .write_new(path, key.to_bytes().as_slice())
            .map_err(|e| InitError::io(path, e))?;

        info!(
            path = %path.display(),
            node_id = %hex::encode(key.node_id()),
            "Generated node key"
        );
        report.created_files.push(path.clone());
        report.key_generated = true;
        Ok(())
    }
}

impl<F: FileSystem, K: KeyGenerator> DataDirectoryApi for NodeInitializer<F, K> {
    fn is_data_dir_initialized(&self, config: &InitConfig) -> Result<bool, InitError> {
        let layout = &config.layout;

        let required = [
            (&layout.data_dir, "data directory"),
            (&layout.database_dir, "database directory"),
            (&layout.log_dir, "log directory"),
            (&layout.log_file, "log file"),
        ];
        for (path, what) in required {
            if !self.fs.exists(path) {
                debug!(path = %path.display(), "Data dir not initialized: {} missing", what);
                return Ok(false);
            }
        }

        if let Some(key_path) = config.node_key.key_path() {
            if !self.fs.exists(key_path) {
                debug!(path = %key_path.display(), "Data dir not initialized: node key missing");
                return Ok(false);
            }
        }

        Ok(self.resolve_node_key(config)?.is_some())
    }

    fn initialize_data_dir(&self, config: &InitConfig) -> Result<DataDirReport, InitError> {
        let layout = &config.layout;
        let mut report = DataDirReport::default();

        if self.ensure_managed_dir(config, &layout.data_dir, MissingPathKind::DataDir)? {
            report.created_dirs.push(layout.data_dir.clone());
        }

        if self.ensure_managed_dir(config, &layout.log_dir, MissingPathKind::LogDir)? {
            report.created_dirs.push(layout.log_dir.clone());
        }
        if !self.fs.exists(&layout.log_file) {
            self.fs
                .touch(&layout.log_file)
                .map_err(|e| InitError::io(&layout.log_file, e))?;
            info!(path = %layout.log_file.display(), "Created log file");
            report.created_files.push(layout.log_file.clone());
        }

        if !self.fs.exists(&layout.database_dir) {
            self.fs
                .create_dir_all(&layout.database_dir)
                .map_err(|e| InitError::io(&layout.database_dir, e))?;
            info!(path = %layout.database_dir.display(), "Created database directory");
            report.created_dirs.push(layout.database_dir.clone());
        }

        self.ensure_node_key(config, &mut report)?;

        Ok(report)
    }
}

impl<F: FileSystem, K: KeyGenerator> DatabaseBootstrapApi for NodeInitializer<F, K> {
    fn is_database_initialized<D: ChainDatabase>(&self, db: &D) -> Result<bool, InitError> {
        match db.get_canonical_head() {
            Ok(_) => Ok(true),
            Err(ChainDbError::CanonicalHeadNotFound) => {
                debug!("Database not initialized: no canonical head");
                Ok(false)
            }
            Err(e) => Err(InitError::Database(e)),
        }
    }

    fn initialize_database<D: ChainDatabase>(
        &self,
        config: &InitConfig,
        db: &mut D,
    ) -> Result<DatabaseStatus, InitError> {
        if self.is_database_initialized(db)? {
            return Ok(DatabaseStatus::AlreadyInitialized);
        }

        let genesis = self
            .genesis
            .lookup(config.network_id)
            .ok_or(InitError::UnsupportedNetwork(config.network_id))?;

        db.persist_header(genesis)?;

        let genesis_hash = genesis.hash();
        info!(
            network_id = config.network_id.0,
            genesis_hash = %hex::encode(genesis_hash),
            "Seeded chain database with genesis header"
        );
        Ok(DatabaseStatus::SeededGenesis { genesis_hash })
    }
}
