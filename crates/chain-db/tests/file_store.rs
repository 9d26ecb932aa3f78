//! Chain database over the file-backed store, across reopen.

use chain_db::{ChainDatabase, ChainDb, ChainDbError, FileBackedKVStore};
use shared_types::BlockHeader;
use tempfile::TempDir;

fn genesis() -> BlockHeader {
    BlockHeader {
        difficulty: 131_072,
        gas_limit: 3_141_592,
        ..Default::default()
    }
}

fn child(parent: &BlockHeader, difficulty: u64) -> BlockHeader {
    BlockHeader {
        parent_hash: parent.hash(),
        block_number: parent.block_number + 1,
        difficulty,
        ..parent.clone()
    }
}

#[test]
fn head_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chain.db");

    let g = genesis();
    let b1 = child(&g, 10);
    {
        let mut db = ChainDb::new(FileBackedKVStore::open(&path).unwrap());
        db.persist_header(&g).unwrap();
        db.persist_header(&b1).unwrap();
    }

    let db = ChainDb::new(FileBackedKVStore::open(&path).unwrap());
    assert_eq!(db.get_canonical_head().unwrap(), b1);
    assert_eq!(db.get_canonical_hash(0).unwrap(), g.hash());
    assert_eq!(db.get_score(&b1.hash()).unwrap(), 131_082);
}

#[test]
fn fresh_file_reports_empty() {
    let dir = TempDir::new().unwrap();
    let db = ChainDb::new(FileBackedKVStore::open(dir.path().join("chain.db")).unwrap());

    assert_eq!(
        db.get_canonical_head().unwrap_err(),
        ChainDbError::CanonicalHeadNotFound
    );
}
