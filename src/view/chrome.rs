//! Host chrome bindings.

use std::fmt;

use chrono::{DateTime, Local};

const BASE_TITLE: &str = "Hotframe Host";

/// Informational status string. Not meant to be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostStatus {
    Starting,
    Watching,
    ManualOnly,
    Reloading,
    Loaded(DateTime<Local>),
    ArtifactMissing,
    LoadFailed,
    Unloaded,
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting => f.write_str(" - Starting..."),
            Self::Watching => f.write_str(" - Watching for changes..."),
            Self::ManualOnly => f.write_str(" - Watcher disabled (manual reload only)"),
            Self::Reloading => f.write_str(" - Reloading..."),
            Self::Loaded(at) => write!(f, " - Loaded ({})", at.format("%H:%M:%S")),
            Self::ArtifactMissing => f.write_str(" - Library not found!"),
            Self::LoadFailed => f.write_str(" - Load failed!"),
            Self::Unloaded => f.write_str(" - Unloaded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
    guest_title: Option<String>,
    load_count: u64,
    last_loaded: Option<DateTime<Local>>,
    status: HostStatus,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            guest_title: None,
            load_count: 0,
            last_loaded: None,
            status: HostStatus::Starting,
        }
    }
}

impl Chrome {
    /// `Hotframe Host - <guest title>` once a guest has been loaded.
    pub fn window_title(&self) -> String {
        match &self.guest_title {
            Some(title) => format!("{BASE_TITLE} - {title}"),
            None => BASE_TITLE.to_string(),
        }
    }

    pub fn load_count(&self) -> u64 {
        self.load_count
    }

    pub fn last_loaded(&self) -> Option<DateTime<Local>> {
        self.last_loaded
    }

    pub fn status(&self) -> &HostStatus {
        &self.status
    }

    pub fn set_status(&mut self, status: HostStatus) {
        self.status = status;
    }

    pub(super) fn record_load(&mut self, title: &str, at: DateTime<Local>) {
        self.guest_title = Some(title.to_string());
        self.load_count += 1;
        self.last_loaded = Some(at);
        self.status = HostStatus::Loaded(at);
    }
}
