//! # Node Runtime Library
//!
//! Configuration, logging and the startup sequence of the node binary,
//! exposed for integration testing. The entry point is `main.rs`.

#![warn(clippy::all)]

pub mod config;
pub mod runtime;
pub mod telemetry;

pub use config::{ConfigError, NodeConfig};
pub use runtime::{open_chain_db, NodeRuntime, NodeStore, StartedNode};
pub use telemetry::{init_logging, LogConfig, LogFileHandle, TelemetryError};
