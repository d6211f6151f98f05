//! The host window: chrome (title, load counter, status) and the content slot.

mod chrome;
mod content;
mod render;

pub use chrome::{Chrome, HostStatus};
pub use content::{ContentHost, ContentView, GuestRootHandle};
pub use render::present;
