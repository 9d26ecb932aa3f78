//! # In-Memory Filesystem
//!
//! Lets the directory operations be exercised without touching the disk.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::ports::outbound::FileSystem;

#[derive(Debug, Default)]
struct MemoryState {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
    read_only: bool,
}

impl MemoryState {
    fn check_writable(&self, path: &Path) -> io::Result<()> {
        if self.read_only {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read-only filesystem: {}", path.display()),
            ));
        }
        Ok(())
    }

    fn check_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.dirs.contains(parent) => {
                Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such directory: {}", parent.display()),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// `FileSystem` held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    state: Mutex<MemoryState>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create a directory and its parents.
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        {
            let mut state = self.state.lock();
            insert_dir_all(&mut state.dirs, path.as_ref());
        }
        self
    }

    /// Pre-create a file, and its parent directories.
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        {
            let path = path.as_ref();
            let mut state = self.state.lock();
            if let Some(parent) = path.parent() {
                insert_dir_all(&mut state.dirs, parent);
            }
            state.files.insert(path.to_path_buf(), contents.into());
        }
        self
    }

    /// Make every mutating call fail with `PermissionDenied`.
    pub fn set_read_only(&self, read_only: bool) {
        self.state.lock().read_only = read_only;
    }

    /// Contents of a file, if present.
    pub fn file_contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.state.lock().files.get(path.as_ref()).cloned()
    }

    /// Remove a file or an empty directory.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock();
        let path = path.as_ref();
        state.files.remove(path);
        state.dirs.remove(path);
    }

    /// Every directory and file path, sorted.
    pub fn entries(&self) -> Vec<PathBuf> {
        let state = self.state.lock();
        let mut entries: Vec<PathBuf> = state
            .dirs
            .iter()
            .chain(state.files.keys())
            .cloned()
            .collect();
        entries.sort();
        entries
    }
}

fn insert_dir_all(dirs: &mut BTreeSet<PathBuf>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        dirs.insert(ancestor.to_path_buf());
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock();
        state.dirs.contains(path) || state.files.contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock();
        if state.dirs.contains(path) {
            return Ok(());
        }
        state.check_writable(path)?;
        if state.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("file exists: {}", path.display()),
            ));
        }
        insert_dir_all(&mut state.dirs, path);
        Ok(())
    }

    fn touch(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock();
        if state.files.contains_key(path) {
            return Ok(());
        }
        state.check_writable(path)?;
        state.check_parent(path)?;
        state.files.insert(path.to_path_buf(), Vec::new());
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.state.lock().files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn write_new(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock();
        state.check_writable(path)?;
        if state.files.contains_key(path) || state.dirs.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("already exists: {}", path.display()),
            ));
        }
        state.check_parent(path)?;
        state.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}
