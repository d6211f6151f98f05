//! Terminal command reader.
//!
//! Reads stdin on its own thread and posts [`HostCommand`]s to the host actor.

use std::io::BufRead;

use tokio::sync::mpsc;

use super::messages::{HostCommand, HostMsg};

pub const HELP: &str = "commands: [r]eload, [u]nload, [q]uit";

/// Spawn the reader. It exits on EOF, on `Close`, or when the host is gone.
pub fn spawn(host_tx: mpsc::Sender<HostMsg>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("hotframe-input".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if crate::core::is_shutdown() {
                    break;
                }
                if line.trim().is_empty() {
                    continue;
                }
                let Some(command) = HostCommand::parse(&line) else {
                    crate::log!("host"; "unknown command `{}` ({})", line.trim(), HELP);
                    continue;
                };
                if host_tx.blocking_send(HostMsg::Command(command)).is_err()
                    || command == HostCommand::Close
                {
                    break;
                }
            }
        })
        .map(|_| ())
}
