//! Actor Message Definitions
//!
//! ```text
//! FileWatcher --FileChanged--> HostActor
//! stdin/Ctrl+C --Command-----> HostActor
//! ```

use std::time::Instant;

/// A matched change of the artifact. Consumed by the debouncer right away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadEvent {
    pub at: Instant,
    pub file_name: String,
}

/// Host-surface commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Re-run the reload sequence now
    Reload,
    /// Tear down the active generation
    Unload,
    /// Stop watching, unload, release everything
    Close,
}

impl HostCommand {
    /// Parse a terminal command line.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "r" | "reload" => Some(Self::Reload),
            "u" | "unload" => Some(Self::Unload),
            "q" | "quit" | "close" | "exit" => Some(Self::Close),
            _ => None,
        }
    }
}

/// Messages to the Host Actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMsg {
    FileChanged(ReloadEvent),
    Command(HostCommand),
}
