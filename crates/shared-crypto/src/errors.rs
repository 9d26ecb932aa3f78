//! Crypto error types.

use thiserror::Error;

/// Key handling errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Bytes have the right length but are not a valid secp256k1 scalar
    #[error("Invalid private key")]
    InvalidPrivateKey,
}
