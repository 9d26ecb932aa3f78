//! # File-Backed Store
//!
//! Persists the whole map to one binary file, rewritten atomically via a
//! temp file and rename on every batch.
//!
//! Format: repeated `[key_len:u32 LE][key][value_len:u32 LE][value]`.
//!
//! A missing file opens as an empty store. A file that exists but cannot be
//! decoded is an error: treating it as empty would make a damaged chain look
//! uninitialized.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{apply_batch, BatchOperation, KeyValueStore};

/// File-backed key-value store.
#[derive(Debug)]
pub struct FileBackedKVStore {
    data: HashMap<Vec<u8>, Vec<u8>>,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open the store at `path`, loading existing contents.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        let data = match fs::read(&path) {
            Ok(bytes) => {
                let data = decode(&bytes).map_err(|reason| KVStoreError::CorruptionError {
                    message: format!("{}: {}", path.display(), reason),
                })?;
                info!(path = %path.display(), keys = data.len(), "Loaded chain store");
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No existing chain store, starting empty");
                HashMap::new()
            }
            Err(e) => {
                return Err(KVStoreError::IOError {
                    message: format!("{}: {}", path.display(), e),
                })
            }
        };

        Ok(Self { data, path })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_to_file(&self, data: &HashMap<Vec<u8>, Vec<u8>>) -> Result<(), KVStoreError> {
        let io_err = |e: std::io::Error| KVStoreError::IOError {
            message: format!("{}: {}", self.path.display(), e),
        };

        let bytes = encode(data);

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).map_err(io_err)?;
        file.write_all(&bytes).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        fs::rename(&temp_path, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        // Stage on a copy so a failed write leaves memory matching disk.
        let mut staged = self.data.clone();
        apply_batch(&mut staged, operations);
        self.save_to_file(&staged)?;
        self.data = staged;
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }
}

fn encode(data: &HashMap<Vec<u8>, Vec<u8>>) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (key, value) in data {
        bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
        bytes.extend_from_slice(key);
        bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
        bytes.extend_from_slice(value);
    }
    bytes
}

fn decode(bytes: &[u8]) -> Result<HashMap<Vec<u8>, Vec<u8>>, String> {
    let mut data = HashMap::new();
    let mut cursor = 0;

    while cursor < bytes.len() {
        let key = read_chunk(bytes, &mut cursor)?;
        let value = read_chunk(bytes, &mut cursor)?;
        data.insert(key, value);
    }

    Ok(data)
}

fn read_chunk(bytes: &[u8], cursor: &mut usize) -> Result<Vec<u8>, String> {
    let len_end = *cursor + 4;
    let len_bytes: [u8; 4] = bytes
        .get(*cursor..len_end)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| format!("truncated length prefix at offset {}", cursor))?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    let chunk = bytes
        .get(len_end..len_end + len)
        .ok_or_else(|| format!("truncated entry at offset {}", len_end))?;
    *cursor = len_end + len;
    Ok(chunk.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileBackedKVStore::open(dir.path().join("chain.db")).unwrap();
        assert_eq!(store.get(b"anything").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_reopen_sees_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chain.db");

        let mut store = FileBackedKVStore::open(&path).unwrap();
        store
            .atomic_batch_write(vec![BatchOperation::put(b"k".to_vec(), b"v".to_vec())])
            .unwrap();
        drop(store);

        let reopened = FileBackedKVStore::open(&path).unwrap();
        assert_eq!(reopened.get(b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_truncated_file_is_corruption() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chain.db");
        fs::write(&path, [5u8, 0, 0, 0, b'a']).unwrap();

        let err = FileBackedKVStore::open(&path).unwrap_err();
        assert!(matches!(err, KVStoreError::CorruptionError { .. }));
    }

    #[test]
    fn test_failed_write_keeps_memory_consistent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("chain.db");

        let mut store = FileBackedKVStore::open(&path).unwrap();
        let result =
            store.atomic_batch_write(vec![BatchOperation::put(b"k".to_vec(), b"v".to_vec())]);

        assert!(matches!(result, Err(KVStoreError::IOError { .. })));
        assert_eq!(store.get(b"k").unwrap(), None);
    }
}
