//! # Chain Database Service
//!
//! `ChainDb` implements `ChainDatabase` over any `KeyValueStore`.
//!
//! ## Canonical Head Selection
//!
//! Each header's score is its parent's score plus its own difficulty
//! (genesis: its own difficulty). A persisted header becomes the canonical
//! head only when its score is strictly greater than the current head's.
//! On a head change the number→hash index is rewritten back to the common
//! ancestor, and stale entries above the new head are removed.

use shared_types::{BlockHeader, Hash};
use tracing::debug;

use crate::domain::errors::ChainDbError;
use crate::domain::keys::KeyPrefix;
use crate::ports::inbound::ChainDatabase;
use crate::ports::outbound::{BatchOperation, KeyValueStore};

/// Header store over a key-value backend.
pub struct ChainDb<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ChainDb<S> {
    /// Wrap a key-value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn canonical_head_hash(&self) -> Result<Option<Hash>, ChainDbError> {
        match self.store.get(&KeyPrefix::canonical_head_key())? {
            Some(bytes) => Ok(Some(decode_hash(&bytes)?)),
            None => Ok(None),
        }
    }

    fn canonical_hash_at(&self, number: u64) -> Result<Option<Hash>, ChainDbError> {
        match self.store.get(&KeyPrefix::canonical_key(number))? {
            Some(bytes) => Ok(Some(decode_hash(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Index updates that make `header` the canonical tip.
    fn canonical_index_ops(
        &self,
        header: &BlockHeader,
        hash: Hash,
        old_head: Option<&BlockHeader>,
    ) -> Result<Vec<BatchOperation>, ChainDbError> {
        let mut ops = vec![BatchOperation::put(
            KeyPrefix::canonical_key(header.block_number),
            hash.to_vec(),
        )];

        // Walk back until the stored index already agrees.
        let mut ancestor_hash = header.parent_hash;
        let mut number = header.block_number;
        while number > 0 {
            number -= 1;
            if self.canonical_hash_at(number)? == Some(ancestor_hash) {
                break;
            }
            ops.push(BatchOperation::put(
                KeyPrefix::canonical_key(number),
                ancestor_hash.to_vec(),
            ));
            ancestor_hash = self.get_header_by_hash(&ancestor_hash)?.parent_hash;
        }

        if let Some(old) = old_head {
            for stale in (header.block_number + 1)..=old.block_number {
                ops.push(BatchOperation::delete(KeyPrefix::canonical_key(stale)));
            }
        }

        ops.push(BatchOperation::put(KeyPrefix::canonical_head_key(), hash.to_vec()));
        Ok(ops)
    }
}

impl<S: KeyValueStore> ChainDatabase for ChainDb<S> {
    fn get_canonical_head(&self) -> Result<BlockHeader, ChainDbError> {
        let hash = self
            .canonical_head_hash()?
            .ok_or(ChainDbError::CanonicalHeadNotFound)?;
        self.get_header_by_hash(&hash)
    }

    fn get_header_by_hash(&self, hash: &Hash) -> Result<BlockHeader, ChainDbError> {
        let bytes = self
            .store
            .get(&KeyPrefix::header_key(hash))?
            .ok_or(ChainDbError::HeaderNotFound { hash: *hash })?;
        bincode::deserialize(&bytes).map_err(|e| ChainDbError::Serialization {
            message: e.to_string(),
        })
    }

    fn get_canonical_hash(&self, number: u64) -> Result<Hash, ChainDbError> {
        self.canonical_hash_at(number)?
            .ok_or(ChainDbError::CanonicalHashNotFound { number })
    }

    fn get_score(&self, hash: &Hash) -> Result<u128, ChainDbError> {
        let bytes = self
            .store
            .get(&KeyPrefix::score_key(hash))?
            .ok_or(ChainDbError::HeaderNotFound { hash: *hash })?;
        let raw: [u8; 16] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ChainDbError::Serialization {
                message: format!("score must be 16 bytes, got {}", bytes.len()),
            })?;
        Ok(u128::from_be_bytes(raw))
    }

    fn header_exists(&self, hash: &Hash) -> Result<bool, ChainDbError> {
        Ok(self.store.exists(&KeyPrefix::header_key(hash))?)
    }

    fn persist_header(&mut self, header: &BlockHeader) -> Result<(), ChainDbError> {
        let hash = header.hash();

        let score = if header.is_genesis() {
            u128::from(header.difficulty)
        } else {
            if !self.header_exists(&header.parent_hash)? {
                return Err(ChainDbError::ParentNotFound {
                    number: header.block_number,
                    parent_hash: header.parent_hash,
                });
            }
            self.get_score(&header.parent_hash)? + u128::from(header.difficulty)
        };

        let encoded = bincode::serialize(header).map_err(|e| ChainDbError::Serialization {
            message: e.to_string(),
        })?;

        let mut ops = vec![
            BatchOperation::put(KeyPrefix::header_key(&hash), encoded),
            BatchOperation::put(KeyPrefix::score_key(&hash), score.to_be_bytes().to_vec()),
        ];

        let old_head = match self.get_canonical_head() {
            Ok(head) => Some(head),
            Err(ChainDbError::CanonicalHeadNotFound) => None,
            Err(e) => return Err(e),
        };
        let head_score = match &old_head {
            Some(head) => Some(self.get_score(&head.hash())?),
            None => None,
        };

        let becomes_head = head_score.map_or(true, |current| score > current);
        if becomes_head {
            ops.extend(self.canonical_index_ops(header, hash, old_head.as_ref())?);
        }

        self.store.atomic_batch_write(ops)?;

        debug!(
            number = header.block_number,
            hash = %hex::encode(hash),
            score,
            canonical = becomes_head,
            "Persisted header"
        );
        Ok(())
    }
}

fn decode_hash(bytes: &[u8]) -> Result<Hash, ChainDbError> {
    bytes.try_into().map_err(|_| ChainDbError::Serialization {
        message: format!("hash must be 32 bytes, got {}", bytes.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::InMemoryKVStore;
    use crate::KVStoreError;

    fn genesis() -> BlockHeader {
        BlockHeader {
            difficulty: 100,
            gas_limit: 5000,
            ..Default::default()
        }
    }

    fn child(parent: &BlockHeader, difficulty: u64, tag: u8) -> BlockHeader {
        BlockHeader {
            parent_hash: parent.hash(),
            block_number: parent.block_number + 1,
            difficulty,
            extra_data: vec![tag],
            ..Default::default()
        }
    }

    fn new_db() -> ChainDb<InMemoryKVStore> {
        ChainDb::new(InMemoryKVStore::new())
    }

    #[test]
    fn test_empty_database_has_no_head() {
        let db = new_db();
        assert_eq!(
            db.get_canonical_head().unwrap_err(),
            ChainDbError::CanonicalHeadNotFound
        );
    }

    #[test]
    fn test_genesis_becomes_head() {
        let mut db = new_db();
        let genesis = genesis();
        db.persist_header(&genesis).unwrap();

        assert_eq!(db.get_canonical_head().unwrap(), genesis);
        assert_eq!(db.get_canonical_hash(0).unwrap(), genesis.hash());
        assert_eq!(db.get_score(&genesis.hash()).unwrap(), 100);
    }

    #[test]
    fn test_orphan_header_rejected() {
        let mut db = new_db();
        let orphan = child(&genesis(), 10, 1);

        let err = db.persist_header(&orphan).unwrap_err();
        assert!(matches!(err, ChainDbError::ParentNotFound { number: 1, .. }));
        assert!(db.store().is_empty());
    }

    #[test]
    fn test_chain_extends_head() {
        let mut db = new_db();
        let g = genesis();
        let b1 = child(&g, 10, 1);
        let b2 = child(&b1, 10, 2);
        for header in [&g, &b1, &b2] {
            db.persist_header(header).unwrap();
        }

        assert_eq!(db.get_canonical_head().unwrap(), b2);
        assert_eq!(db.get_score(&b2.hash()).unwrap(), 120);
        assert_eq!(db.get_canonical_hash(1).unwrap(), b1.hash());
    }

    #[test]
    fn test_lighter_fork_does_not_move_head() {
        let mut db = new_db();
        let g = genesis();
        let heavy = child(&g, 50, 1);
        let light = child(&g, 5, 2);
        db.persist_header(&g).unwrap();
        db.persist_header(&heavy).unwrap();
        db.persist_header(&light).unwrap();

        assert_eq!(db.get_canonical_head().unwrap(), heavy);
        assert!(db.header_exists(&light.hash()).unwrap());
    }

    #[test]
    fn test_heavier_shorter_fork_reorgs_index() {
        let mut db = new_db();
        let g = genesis();
        let a1 = child(&g, 10, 1);
        let a2 = child(&a1, 10, 2);
        let b1 = child(&g, 50, 3);
        for header in [&g, &a1, &a2, &b1] {
            db.persist_header(header).unwrap();
        }

        assert_eq!(db.get_canonical_head().unwrap(), b1);
        assert_eq!(db.get_canonical_hash(1).unwrap(), b1.hash());
        assert_eq!(
            db.get_canonical_hash(2).unwrap_err(),
            ChainDbError::CanonicalHashNotFound { number: 2 }
        );
    }

    #[test]
    fn test_second_genesis_with_equal_score_is_not_canonical() {
        let mut db = new_db();
        let first = genesis();
        let second = BlockHeader {
            extra_data: b"other".to_vec(),
            ..genesis()
        };
        db.persist_header(&first).unwrap();
        db.persist_header(&second).unwrap();

        assert_eq!(db.get_canonical_head().unwrap(), first);
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
            Err(KVStoreError::IOError {
                message: "permission denied".to_string(),
            })
        }

        fn atomic_batch_write(&mut self, _ops: Vec<BatchOperation>) -> Result<(), KVStoreError> {
            Err(KVStoreError::IOError {
                message: "permission denied".to_string(),
            })
        }
    }

    #[test]
    fn test_read_failure_is_not_reported_as_empty() {
        let db = ChainDb::new(BrokenStore);
        let err = db.get_canonical_head().unwrap_err();
        assert!(matches!(err, ChainDbError::Store(KVStoreError::IOError { .. })));
    }

    #[test]
    fn test_corrupt_head_pointer() {
        let mut store = InMemoryKVStore::new();
        store
            .atomic_batch_write(vec![BatchOperation::put(
                KeyPrefix::canonical_head_key(),
                vec![1, 2, 3],
            )])
            .unwrap();
        let db = ChainDb::new(store);

        assert!(matches!(
            db.get_canonical_head().unwrap_err(),
            ChainDbError::Serialization { .. }
        ));
    }
}
