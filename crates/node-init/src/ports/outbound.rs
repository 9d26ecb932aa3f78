//! # Outbound Ports (Driven Ports)
//!
//! Capabilities the bootstrap operations need from the host.

use std::io;
use std::path::Path;

use shared_crypto::NodeKey;

/// Filesystem access used by the directory operations.
///
/// Production: `OsFileSystem`
/// Testing: `MemoryFileSystem`
pub trait FileSystem: Send + Sync {
    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents. No-op if it exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create an empty file if missing. Never truncates.
    fn touch(&self, path: &Path) -> io::Result<()>;

    /// Read a whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write a new file readable only by its owner.
    ///
    /// Fails with `AlreadyExists` rather than overwrite.
    fn write_new(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Source of fresh node identity keys.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> NodeKey;
}
