//! # Bootstrap Errors

use std::fmt;
use std::io;
use std::path::PathBuf;

use chain_db::ChainDbError;
use shared_crypto::CryptoError;
use shared_types::NetworkId;
use thiserror::Error;

use crate::adapters::lock::LockError;
use crate::genesis::GenesisError;

/// Which configured path was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPathKind {
    DataDir,
    LogDir,
    NodeKey,
}

impl fmt::Display for MissingPathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MissingPathKind::DataDir => "data directory",
            MissingPathKind::LogDir => "log directory",
            MissingPathKind::NodeKey => "node key",
        };
        f.write_str(name)
    }
}

/// Errors from the bootstrap operations.
#[derive(Debug, Error)]
pub enum InitError {
    /// A path outside the managed root does not exist.
    #[error("{kind} {} does not exist and is outside the managed root; create it or change the configuration", path.display())]
    MissingPath { path: PathBuf, kind: MissingPathKind },

    /// No genesis header is known for the network.
    #[error("Unsupported network {0}: no genesis header is known")]
    UnsupportedNetwork(NetworkId),

    /// The node key file exists but does not hold a valid key.
    #[error("Invalid node key file {}: {source}", path.display())]
    InvalidNodeKey {
        path: PathBuf,
        #[source]
        source: CryptoError,
    },

    /// Filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Chain database failure other than an empty database.
    #[error("Chain database error: {0}")]
    Database(#[from] ChainDbError),

    /// Custom genesis header could not be built.
    #[error(transparent)]
    Genesis(#[from] GenesisError),

    /// Another process holds the init lock.
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl InitError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        InitError::Io {
            path: path.into(),
            source,
        }
    }
}
