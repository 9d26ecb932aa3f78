//! # Ports Layer
//!
//! - `inbound.rs` - Bootstrap API exposed to the node runtime
//! - `outbound.rs` - Filesystem and key generation required by the service

pub mod inbound;
pub mod outbound;
