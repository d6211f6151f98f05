//! `hotframe run` - open the host and hot-reload until closed.

use anyhow::{Context, Result};

use crate::actor::Coordinator;
use crate::config::HostConfig;

/// Run the host on a current-thread runtime.
///
/// Loading and unloading happen on this thread only; the watcher and the
/// terminal reader post messages to it.
pub fn run_host(config: HostConfig) -> Result<()> {
    crate::log!("host"; "artifact: {}", config.artifact_path.display());
    if let Some(path) = &config.config_path {
        crate::debug!("config"; "using {}", path.display());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start host runtime")?;

    runtime.block_on(Coordinator::with_config(config).run())
}
