//! Actor System for Hot Reload
//!
//! Message-passing concurrency for the host:
//!
//! ```text
//! FileWatcher ──FileChanged──┐
//! stdin       ──Command──────┼──▶ HostActor (UI thread) ──▶ ReloadOrchestrator ──▶ ContentHost
//! Ctrl+C      ──Close────────┘
//! ```
//!
//! Background sources only post messages; all reload state lives on the
//! host actor.
//!
//! # Module Structure
//!
//! - `messages` - Message types posted to the host actor
//! - `fs` - File system watcher, artifact filter, consumer-side debouncer
//! - `host` - The host actor and its clock-driven state
//! - `input` - Terminal command reader
//! - `coordinator` - Wires up and runs the host

pub mod coordinator;
pub mod fs;
pub mod host;
pub mod input;
pub mod messages;

pub use coordinator::{Coordinator, build_orchestrator};
