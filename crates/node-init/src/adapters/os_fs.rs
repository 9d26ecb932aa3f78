//! # OS Filesystem Adapter

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::ports::outbound::FileSystem;

/// `FileSystem` backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn touch(&self, path: &Path) -> io::Result<()> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(drop)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_new(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        publish_new(path, |file| file.write_all(contents))
    }
}

/// Write a file in full under a temporary name, then link it into place.
///
/// `path` ends up either absent or holding everything `fill` wrote; a
/// failure part way leaves nothing behind. Linking fails with
/// `AlreadyExists` instead of replacing an existing file.
fn publish_new<W>(path: &Path, fill: W) -> io::Result<()>
where
    W: FnOnce(&mut File) -> io::Result<()>,
{
    let temp_path = temp_path_for(path);

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let result = options
        .open(&temp_path)
        .and_then(|mut file| {
            fill(&mut file)?;
            file.sync_all()
        })
        .and_then(|()| fs::hard_link(&temp_path, path));

    let cleanup = fs::remove_file(&temp_path);
    result?;
    if let Err(e) = cleanup {
        warn!(path = %temp_path.display(), error = %e, "Failed to remove temporary file");
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_touch_keeps_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("node.log");
        fs::write(&path, b"existing line\n").unwrap();

        OsFileSystem.touch(&path).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"existing line\n");
    }

    #[test]
    fn test_write_new_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodekey");

        OsFileSystem.write_new(&path, b"first").unwrap();
        let err = OsFileSystem.write_new(&path, b"second").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&path).unwrap(), b"first");
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodekey");

        let err = publish_new(&path, |file| {
            file.write_all(&[0x11; 16])?;
            Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "no space left on device");
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

        // Once the fault clears, a retry succeeds.
        OsFileSystem.write_new(&path, &[0x11; 32]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![0x11; 32]);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_new_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodekey");
        OsFileSystem.write_new(&path, b"secret").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
