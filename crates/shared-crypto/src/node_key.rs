//! # Node Identity Key (secp256k1)
//!
//! The private key a node uses to derive its network-level identity.
//! Persisted as the raw 32-byte scalar.

use std::fmt;

use k256::ecdsa::{SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::CryptoError;

/// Length of a serialized node key.
pub const NODE_KEY_LENGTH: usize = 32;

/// Compressed secp256k1 public key (33 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodePublicKey([u8; 33]);

impl NodePublicKey {
    /// Get raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Derive the node id (SHA-256 of the compressed key).
    pub fn to_node_id(&self) -> [u8; 32] {
        Sha256::digest(self.0).into()
    }
}

impl From<&VerifyingKey> for NodePublicKey {
    fn from(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(true);
        // SEC1 compressed points are always 33 bytes
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(point.as_bytes());
        Self(bytes)
    }
}

/// secp256k1 node identity key.
#[derive(Clone)]
pub struct NodeKey {
    signing_key: SigningKey,
}

impl NodeKey {
    /// Generate a random key.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Decode a key from its raw 32-byte form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != NODE_KEY_LENGTH {
            return Err(CryptoError::InvalidKeyLength {
                expected: NODE_KEY_LENGTH,
                actual: bytes.len(),
            });
        }
        let signing_key =
            SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Decode a key from hex, with or without a `0x` prefix.
    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        let trimmed = encoded.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = Zeroizing::new(hex::decode(digits).map_err(|_| CryptoError::InvalidPrivateKey)?);
        Self::from_bytes(&bytes)
    }

    /// Raw secret bytes, wiped when dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; NODE_KEY_LENGTH]> {
        Zeroizing::new(self.signing_key.to_bytes().into())
    }

    /// Compressed public key.
    pub fn public_key(&self) -> NodePublicKey {
        NodePublicKey::from(self.signing_key.verifying_key())
    }

    /// Node id derived from the public key.
    pub fn node_id(&self) -> [u8; 32] {
        self.public_key().to_node_id()
    }
}

impl PartialEq for NodeKey {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for NodeKey {}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeKey")
            .field("node_id", &hex::encode(self.node_id()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_bytes() {
        let original = NodeKey::generate();
        let bytes = original.to_bytes();
        let restored = NodeKey::from_bytes(bytes.as_slice()).unwrap();

        assert_eq!(original, restored);
        assert_eq!(*original.to_bytes(), *restored.to_bytes());
    }

    #[test]
    fn test_rejects_wrong_length() {
        let result = NodeKey::from_bytes(&[0xABu8; 31]);
        assert_eq!(
            result.unwrap_err(),
            CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 31
            }
        );
    }

    #[test]
    fn test_rejects_zero_scalar() {
        let result = NodeKey::from_bytes(&[0u8; 32]);
        assert_eq!(result.unwrap_err(), CryptoError::InvalidPrivateKey);
    }

    #[test]
    fn test_from_hex_with_prefix() {
        let key = NodeKey::from_bytes(&[0x11u8; 32]).unwrap();
        let encoded = format!("0x{}", hex::encode([0x11u8; 32]));
        assert_eq!(NodeKey::from_hex(&encoded).unwrap(), key);
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(NodeKey::from_hex("not-hex").is_err());
    }

    #[test]
    fn test_node_id_deterministic() {
        let key = NodeKey::from_bytes(&[0x42u8; 32]).unwrap();
        assert_eq!(key.node_id(), key.clone().node_id());
        assert_eq!(key.public_key().as_bytes().len(), 33);
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = NodeKey::from_bytes(&[0x42u8; 32]).unwrap();
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains(&hex::encode([0x42u8; 32])));
        assert!(rendered.contains(&hex::encode(key.node_id())));
    }

    #[test]
    fn test_generated_keys_differ() {
        assert_ne!(NodeKey::generate(), NodeKey::generate());
    }
}
