//! # Storage Adapters
//!
//! - `file` - Single-file store, no native dependencies
//! - `rocksdb` - RocksDB store (feature `rocksdb`)

pub mod file;

#[cfg(feature = "rocksdb")]
pub mod rocksdb;

pub use file::FileBackedKVStore;

#[cfg(feature = "rocksdb")]
pub use self::rocksdb::{RocksDbConfig, RocksDbStore};
