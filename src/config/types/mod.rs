//! Configuration utility types.
//!
//! | Module   | Purpose                                      |
//! |----------|----------------------------------------------|
//! | `error`  | Configuration error types                    |
//! | `path`   | Artifact path resolution                     |

mod error;
mod path;

pub use error::ConfigError;
pub use path::PathResolver;
