//! The single content slot of the host window.

use chrono::Local;
use hotframe_guest::Visual;

use super::{Chrome, HostStatus};
use crate::context::{Generation, GuestRoot};

/// Extracted guest content owned by the host. Holds no guest memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestRootHandle {
    generation: Generation,
    title: String,
    content: Visual,
}

impl GuestRootHandle {
    pub fn new(generation: Generation, root: GuestRoot) -> Self {
        Self {
            generation,
            title: root.title,
            content: root.content,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &Visual {
        &self.content
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContentView {
    #[default]
    Placeholder,
    Mounted(GuestRootHandle),
    Message(String),
}

#[derive(Debug, Default)]
pub struct ContentHost {
    view: ContentView,
    chrome: Chrome,
}

impl ContentHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is shown with `handle` and record the load.
    pub fn mount(&mut self, handle: GuestRootHandle) {
        self.chrome.record_load(handle.title(), Local::now());
        self.view = ContentView::Mounted(handle);
    }

    /// Back to the empty placeholder. Returns the handle that was mounted.
    pub fn unmount(&mut self) -> Option<GuestRootHandle> {
        match std::mem::take(&mut self.view) {
            ContentView::Mounted(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn show_message(&mut self, text: impl Into<String>) {
        self.view = ContentView::Message(text.into());
    }

    pub fn view(&self) -> &ContentView {
        &self.view
    }

    pub fn mounted(&self) -> Option<&GuestRootHandle> {
        match &self.view {
            ContentView::Mounted(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    pub fn set_status(&mut self, status: HostStatus) {
        self.chrome.set_status(status);
    }
}
