//! # Quantum-Chain Node Runtime
//!
//! Bootstraps the node's on-disk state.
//!
//! ## Startup Sequence
//!
//! 1. Install logging (`QC_LOG_LEVEL`, `QC_JSON_LOGS`)
//! 2. Load configuration from the environment
//! 3. Initialize the data directory, node key and chain database
//! 4. Send further logs to the node log file as well
//!
//! Any fatal condition exits non-zero before anything else runs.

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use node_runtime::{init_logging, LogConfig, NodeConfig, NodeRuntime};

fn main() -> Result<()> {
    let log_file = init_logging(&LogConfig::from_env()).context("Failed to initialize logging")?;

    let result = NodeConfig::from_env()
        .context("Invalid configuration")
        .and_then(|config| NodeRuntime::new(config).start());

    let node = match result {
        Ok(node) => node,
        Err(e) => {
            error!("{:#}", e);
            return Err(e);
        }
    };

    if let Err(e) = log_file.attach(&node.log_file) {
        warn!(path = %node.log_file.display(), error = %e, "Failed to open log file");
    }

    info!(
        node_id = %hex::encode(node.report.node_id),
        head_number = node.report.head_number,
        head_hash = %hex::encode(node.report.head_hash),
        "Node is ready"
    );

    Ok(())
}
