//! # Ports Layer
//!
//! - `inbound.rs` - Driving port (API exposed to the bootstrap core and node)
//! - `outbound.rs` - Driven port (key-value backend required by the service)

pub mod inbound;
pub mod outbound;
