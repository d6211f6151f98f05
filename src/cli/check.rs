//! `hotframe check` - load the app module once and report.

use std::time::Instant;

use anyhow::{Result, bail};

use crate::actor::build_orchestrator;
use crate::config::HostConfig;
use crate::logger;
use crate::view::{ContentHost, present};

/// Load one generation, print the window, then tear everything down.
pub fn check_artifact(config: &HostConfig) -> Result<()> {
    let mut orchestrator = build_orchestrator(config);
    let mut host = ContentHost::new();
    let now = Instant::now();

    orchestrator.sweep_stale_snapshots();
    let result = orchestrator.reload(&mut host, now);
    present(&host);
    orchestrator.close(&mut host, now);

    match result {
        Ok(generation) => {
            logger::status_success(&format!(
                "{} loaded as {}",
                host.chrome().window_title(),
                generation
            ));
            Ok(())
        }
        Err(e) => bail!("{}: {}", config.artifact_path.display(), e),
    }
}
