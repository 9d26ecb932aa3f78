//! # Domain Layer
//!
//! Error types and the key layout of the header store.

pub mod errors;
pub mod keys;
