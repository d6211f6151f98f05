//! Configuration section definitions.
//!
//! Each module corresponds to a section in `hotframe.toml`:
//!
//! | Module     | TOML Section   | Purpose                              |
//! |------------|----------------|--------------------------------------|
//! | `artifact` | `[artifact]`   | Which app module library to load     |
//! | `watch`    | `[watch]`      | File watcher, debounce, settle delay |
//! | `reload`   | `[reload]`     | Scratch copies and dependency policy |

mod artifact;
mod reload;
mod watch;

pub use artifact::ArtifactConfig;
pub use reload::ReloadConfig;
pub use watch::WatchConfig;
