//! Reload Module
//!
//! Turns "the artifact changed" into "the new generation is on screen".
//!
//! # Architecture
//!
//! ```text
//! trigger -> unmount -> unload gN-1 -> snapshot -> context gN -> root -> mount
//!                          │                                  │
//!                          └── retire snapshot gN-1 ◀─ receipt└── (failure) fallback message
//! ```
//!
//! # Modules
//!
//! - `artifact` - The watched build output
//! - `error` - Recoverable failure taxonomy
//! - `orchestrator` - Unload-before-load state machine
//! - `snapshot` - Per-generation scratch copies and their cleanup

mod artifact;
mod error;
mod orchestrator;
mod snapshot;


pub use artifact::ModuleArtifact;
pub use error::ReloadError;
pub use orchestrator::ReloadOrchestrator;
pub use snapshot::ScratchArea;

#[cfg(test)]
use orchestrator::ReloadState;
