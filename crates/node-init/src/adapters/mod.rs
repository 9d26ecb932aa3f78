//! # Adapters
//!
//! - `os_fs` - Real filesystem
//! - `memory_fs` - In-memory filesystem for tests and dry runs
//! - `keygen` - Random and fixed node key generators
//! - `lock` - Advisory init lock (fs2)

pub mod keygen;
pub mod lock;
pub mod memory_fs;
pub mod os_fs;

pub use keygen::{FixedKeyGenerator, RandomKeyGenerator};
pub use lock::{InitLock, LockError};
pub use memory_fs::MemoryFileSystem;
pub use os_fs::OsFileSystem;
