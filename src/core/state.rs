//! Shutdown routing for the host process.
//!
//! Two states:
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)
//! - `HOST_TX`: Is a host loop registered to receive `Close`?

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use crate::actor::messages::{HostCommand, HostMsg};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Host actor inbox for graceful shutdown
static HOST_TX: OnceLock<mpsc::Sender<HostMsg>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether a host loop has been registered:
/// - Before `register_host()`: exit immediately, nothing is loaded yet
/// - After `register_host()`: post `Close` so the host unloads and flushes scratch
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        let repeated = SHUTDOWN.swap(true, Ordering::SeqCst);

        match HOST_TX.get() {
            Some(tx) if !repeated => {
                crate::log!("host"; "shutting down...");
                if tx.try_send(HostMsg::Command(HostCommand::Close)).is_err() {
                    std::process::exit(0);
                }
            }
            // Second Ctrl+C, or nothing to tear down
            _ => std::process::exit(0),
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the host actor inbox for graceful shutdown
pub fn register_host(tx: mpsc::Sender<HostMsg>) {
    let _ = HOST_TX.set(tx);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
