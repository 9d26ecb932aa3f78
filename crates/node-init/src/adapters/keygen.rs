//! # Key Generators

use std::sync::atomic::{AtomicUsize, Ordering};

use shared_crypto::NodeKey;

use crate::ports::outbound::KeyGenerator;

/// Generates keys from the OS-seeded RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> NodeKey {
        NodeKey::generate()
    }
}

/// Always hands out the same key and counts how often it was asked.
#[derive(Debug)]
pub struct FixedKeyGenerator {
    key: NodeKey,
    calls: AtomicUsize,
}

impl FixedKeyGenerator {
    pub fn new(key: NodeKey) -> Self {
        Self {
            key,
            calls: AtomicUsize::new(0),
        }
    }

    /// The key returned by every call.
    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    /// Number of keys generated so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyGenerator for FixedKeyGenerator {
    fn generate(&self) -> NodeKey {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.key.clone()
    }
}
