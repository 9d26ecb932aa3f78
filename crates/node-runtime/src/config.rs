//! # Node Configuration
//!
//! Built from environment variables, resolved once at startup and passed
//! down as an explicit value.
//!
//! ## Environment Variables
//!
//! - `QC_ROOT_DIR`: Managed root (default: `$XDG_DATA_HOME/quantum-chain`,
//!   then `$HOME/.local/share/quantum-chain`, then `./.quantum-chain`)
//! - `QC_NETWORK_ID`: Network id (default: 1, mainnet)
//! - `QC_DATA_DIR`: Custom data directory (default: `<root>/<network>`)
//! - `QC_LOG_DIR`: Custom log directory (default: `<data dir>/logs`)
//! - `QC_NODEKEY`: Hex-encoded node key, kept in memory only
//! - `QC_NODEKEY_PATH`: Node key file (default: `<data dir>/nodekey`)
//! - `QC_DEV_GENESIS`: Also support the devnet genesis (network 1337)
//!
//! Only directories under the root are created automatically. A
//! `QC_DATA_DIR` outside the root must already exist, and so must its
//! `logs/` directory unless `QC_LOG_DIR` points somewhere that exists or
//! lies under the root.
//!
//! Relative paths are resolved against the working directory here, so the
//! managed-root check downstream only ever compares absolute paths.

use std::env;
use std::path::{Path, PathBuf};

use node_init::genesis::{GenesisBuilder, GenesisConfig, GenesisError, GenesisHeaderTable};
use node_init::{DataDirectoryLayout, InitConfig, NodeKeySetting};
use shared_crypto::{CryptoError, NodeKey};
use shared_types::NetworkId;
use thiserror::Error;
use tracing::warn;

/// Directory name of the default managed root.
pub const APP_DIR_NAME: &str = "quantum-chain";

/// Configuration errors. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `QC_NETWORK_ID` is not an unsigned integer.
    #[error("QC_NETWORK_ID must be an unsigned integer, got {value:?}")]
    InvalidNetworkId { value: String },

    /// `QC_NODEKEY` is not a valid key.
    #[error("QC_NODEKEY is not a valid node key: {0}")]
    InvalidNodeKey(#[source] CryptoError),

    /// Both an in-memory key and a key file were configured.
    #[error("QC_NODEKEY and QC_NODEKEY_PATH are mutually exclusive")]
    ConflictingNodeKey,

    /// Relative paths cannot be resolved.
    #[error("Cannot determine working directory: {0}")]
    NoWorkingDirectory(#[source] std::io::Error),
}

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Directory under which missing paths may be created.
    pub root_dir: PathBuf,
    pub network_id: NetworkId,
    /// Overrides `<root>/<network>`.
    pub data_dir: Option<PathBuf>,
    /// Overrides `<data dir>/logs`.
    pub log_dir: Option<PathBuf>,
    /// Key held in memory; no key file is used.
    pub node_key: Option<NodeKey>,
    /// Overrides `<data dir>/nodekey`.
    pub node_key_path: Option<PathBuf>,
    /// Register the devnet genesis header.
    pub dev_genesis: bool,
}

impl NodeConfig {
    /// Defaults for `root_dir`: mainnet, standard layout, key file.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            network_id: NetworkId::MAINNET,
            data_dir: None,
            log_dir: None,
            node_key: None,
            node_key_path: None,
            dev_genesis: false,
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = env::current_dir().map_err(ConfigError::NoWorkingDirectory)?;
        Self::from_lookup(|name| env::var(name).ok(), &cwd)
    }

    /// Load configuration from `lookup`, resolving relative paths against `cwd`.
    pub fn from_lookup<F>(lookup: F, cwd: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path_var = |name: &str| -> Option<PathBuf> {
            match lookup(name) {
                Some(value) if value.trim().is_empty() => {
                    warn!(variable = name, "Ignoring empty path");
                    None
                }
                Some(value) => Some(absolutize(cwd, Path::new(value.trim()))),
                None => None,
            }
        };

        let root_dir = path_var("QC_ROOT_DIR").unwrap_or_else(|| default_root_dir(&lookup, cwd));

        let network_id = match lookup("QC_NETWORK_ID") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(NetworkId)
                .map_err(|_| ConfigError::InvalidNetworkId { value })?,
            None => NetworkId::MAINNET,
        };

        let node_key = lookup("QC_NODEKEY")
            .map(|encoded| NodeKey::from_hex(&encoded))
            .transpose()
            .map_err(ConfigError::InvalidNodeKey)?;
        let node_key_path = path_var("QC_NODEKEY_PATH");
        if node_key.is_some() && node_key_path.is_some() {
            return Err(ConfigError::ConflictingNodeKey);
        }

        let dev_genesis = lookup("QC_DEV_GENESIS")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            root_dir,
            network_id,
            data_dir: path_var("QC_DATA_DIR"),
            log_dir: path_var("QC_LOG_DIR"),
            node_key,
            node_key_path,
            dev_genesis,
        })
    }

    /// Paths and key setting for the bootstrap operations.
    pub fn init_config(&self) -> InitConfig {
        let mut layout = match &self.data_dir {
            Some(dir) => DataDirectoryLayout::new(dir),
            None => DataDirectoryLayout::for_network(&self.root_dir, self.network_id),
        };
        if let Some(log_dir) = &self.log_dir {
            layout = layout.with_log_dir(log_dir);
        }

        let node_key = match (&self.node_key, &self.node_key_path) {
            (Some(key), _) => NodeKeySetting::Supplied(key.clone()),
            (None, Some(path)) => NodeKeySetting::File(path.clone()),
            (None, None) => NodeKeySetting::File(layout.default_node_key_path()),
        };

        InitConfig::new(layout, &self.root_dir, self.network_id, node_key)
    }

    /// Supported genesis headers.
    pub fn genesis_table(&self) -> Result<GenesisHeaderTable, GenesisError> {
        let mut table = GenesisHeaderTable::with_known_networks();
        if self.dev_genesis {
            let builder = GenesisBuilder::new(GenesisConfig::devnet());
            let network = builder.network_id();
            table.register(network, builder.build()?);
        }
        Ok(table)
    }
}

/// Boolean env flag: `true`/`1`/`yes`, case-insensitive.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn default_root_dir<F>(lookup: &F, cwd: &Path) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(xdg) = non_empty("XDG_DATA_HOME") {
        return absolutize(cwd, Path::new(&xdg)).join(APP_DIR_NAME);
    }
    if let Some(home) = non_empty("HOME") {
        return absolutize(cwd, Path::new(&home))
            .join(".local")
            .join("share")
            .join(APP_DIR_NAME);
    }
    cwd.join(format!(".{}", APP_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<NodeConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|name| vars.get(name).cloned(), Path::new("/work"))
    }

    #[test]
    fn test_defaults_under_xdg_data_home() {
        let config = load(&[("XDG_DATA_HOME", "/xdg"), ("HOME", "/home/op")]).unwrap();

        assert_eq!(config.root_dir, PathBuf::from("/xdg/quantum-chain"));
        assert_eq!(config.network_id, NetworkId::MAINNET);

        let init = config.init_config();
        assert_eq!(init.layout.data_dir, PathBuf::from("/xdg/quantum-chain/mainnet"));
        assert_eq!(
            init.node_key,
            NodeKeySetting::File(PathBuf::from("/xdg/quantum-chain/mainnet/nodekey"))
        );
    }

    #[test]
    fn test_root_falls_back_to_home_then_cwd() {
        let config = load(&[("HOME", "/home/op")]).unwrap();
        assert_eq!(
            config.root_dir,
            PathBuf::from("/home/op/.local/share/quantum-chain")
        );

        let config = load(&[]).unwrap();
        assert_eq!(config.root_dir, PathBuf::from("/work/.quantum-chain"));
    }

    #[test]
    fn test_relative_paths_are_absolutized() {
        let config = load(&[("QC_ROOT_DIR", "state"), ("QC_DATA_DIR", "./custom")]).unwrap();

        assert_eq!(config.root_dir, PathBuf::from("/work/state"));
        assert_eq!(config.data_dir, Some(PathBuf::from("/work/./custom")));
    }

    #[test]
    fn test_network_id_is_parsed() {
        let config = load(&[("QC_ROOT_DIR", "/r"), ("QC_NETWORK_ID", "3")]).unwrap();
        assert_eq!(config.network_id, NetworkId::ROPSTEN);
        assert_eq!(
            config.init_config().layout.data_dir,
            PathBuf::from("/r/ropsten")
        );
    }

    #[test]
    fn test_bad_network_id_is_fatal() {
        let err = load(&[("QC_NETWORK_ID", "main")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNetworkId { .. }));
    }

    #[test]
    fn test_supplied_node_key() {
        let key = NodeKey::generate();
        let hex_key = hex::encode(key.to_bytes().as_slice());
        let config = load(&[("QC_ROOT_DIR", "/r"), ("QC_NODEKEY", &hex_key)]).unwrap();

        assert_eq!(config.init_config().node_key, NodeKeySetting::Supplied(key));
    }

    #[test]
    fn test_bad_node_key_is_fatal() {
        let err = load(&[("QC_NODEKEY", "abcd")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNodeKey(_)));
    }

    #[test]
    fn test_key_and_key_path_conflict() {
        let hex_key = hex::encode(NodeKey::generate().to_bytes().as_slice());
        let err = load(&[("QC_NODEKEY", &hex_key), ("QC_NODEKEY_PATH", "/k")]).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingNodeKey));
    }

    #[test]
    fn test_custom_dirs() {
        let config = load(&[
            ("QC_ROOT_DIR", "/r"),
            ("QC_DATA_DIR", "/data"),
            ("QC_LOG_DIR", "/var/log/qc"),
            ("QC_NODEKEY_PATH", "/keys/node"),
        ])
        .unwrap();

        let init = config.init_config();
        assert_eq!(init.layout.data_dir, PathBuf::from("/data"));
        assert_eq!(init.layout.database_dir, PathBuf::from("/data/chain"));
        assert_eq!(init.layout.log_file, PathBuf::from("/var/log/qc/node.log"));
        assert_eq!(init.node_key, NodeKeySetting::File(PathBuf::from("/keys/node")));
        assert_eq!(init.managed_root, PathBuf::from("/r"));
    }

    #[test]
    fn test_empty_path_is_ignored() {
        let config = load(&[("QC_ROOT_DIR", "/r"), ("QC_DATA_DIR", "  ")]).unwrap();
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_dev_genesis_registers_devnet() {
        let config = load(&[("QC_DEV_GENESIS", "true")]).unwrap();
        let table = config.genesis_table().unwrap();
        assert!(table.lookup(NetworkId(1337)).is_some());

        let config = load(&[]).unwrap();
        assert!(config.genesis_table().unwrap().lookup(NetworkId(1337)).is_none());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
    }
}
