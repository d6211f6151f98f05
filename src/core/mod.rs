//! Process-wide state.

mod state;

pub use state::{is_shutdown, register_host, setup_shutdown_handler};
