//! # Data Directory Layout
//!
//! The paths and settings the bootstrap operations act on, passed
//! explicitly to every operation.

use std::path::{Path, PathBuf};

use shared_crypto::NodeKey;
use shared_types::NetworkId;

/// Name of the chain database directory inside the data directory.
pub const DATABASE_DIR_NAME: &str = "chain";

/// Name of the log directory inside the data directory.
pub const LOG_DIR_NAME: &str = "logs";

/// Name of the log file inside the log directory.
pub const LOG_FILE_NAME: &str = "node.log";

/// Name of the node key file inside the data directory.
pub const NODE_KEY_FILE_NAME: &str = "nodekey";

/// On-disk locations of a node's state.
///
/// The database and log directories are usually children of `data_dir`,
/// but each is checked and created on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDirectoryLayout {
    pub data_dir: PathBuf,
    pub database_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_file: PathBuf,
}

impl DataDirectoryLayout {
    /// Layout rooted at `data_dir` with the default child names.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let log_dir = data_dir.join(LOG_DIR_NAME);
        Self {
            database_dir: data_dir.join(DATABASE_DIR_NAME),
            log_file: log_dir.join(LOG_FILE_NAME),
            log_dir,
            data_dir,
        }
    }

    /// Default layout for `network` under the managed `root`.
    pub fn for_network(root: &Path, network: NetworkId) -> Self {
        Self::new(root.join(network.dir_name()))
    }

    /// Replace the log directory, keeping the log file name.
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self.log_file = self.log_dir.join(LOG_FILE_NAME);
        self
    }

    /// Default node key file location.
    pub fn default_node_key_path(&self) -> PathBuf {
        self.data_dir.join(NODE_KEY_FILE_NAME)
    }
}

/// Where the node identity key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKeySetting {
    /// Key supplied in memory; no key file is used.
    Supplied(NodeKey),
    /// Key loaded from (or generated into) this file.
    File(PathBuf),
}

impl NodeKeySetting {
    /// Configured key file path, if any.
    pub fn key_path(&self) -> Option<&Path> {
        match self {
            NodeKeySetting::Supplied(_) => None,
            NodeKeySetting::File(path) => Some(path),
        }
    }
}

/// Immutable configuration for the bootstrap operations.
#[derive(Debug, Clone)]
pub struct InitConfig {
    pub layout: DataDirectoryLayout,
    /// Directory under which missing paths may be created.
    pub managed_root: PathBuf,
    pub network_id: NetworkId,
    pub node_key: NodeKeySetting,
}

impl InitConfig {
    pub fn new(
        layout: DataDirectoryLayout,
        managed_root: impl Into<PathBuf>,
        network_id: NetworkId,
        node_key: NodeKeySetting,
    ) -> Self {
        Self {
            layout,
            managed_root: managed_root.into(),
            network_id,
            node_key,
        }
    }

    /// Default layout for `network` under `root`, key file in the data dir.
    pub fn for_network(root: impl Into<PathBuf>, network_id: NetworkId) -> Self {
        let root = root.into();
        let layout = DataDirectoryLayout::for_network(&root, network_id);
        let node_key = NodeKeySetting::File(layout.default_node_key_path());
        Self::new(layout, root, network_id, node_key)
    }

    /// Replace the node key setting.
    pub fn with_node_key(mut self, node_key: NodeKeySetting) -> Self {
        self.node_key = node_key;
        self
    }
}
