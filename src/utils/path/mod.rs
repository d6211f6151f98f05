//! Path utilities.
//!
//! - [`fs`]: filesystem path normalization and library file naming

pub mod fs;

pub use fs::{library_file_name, normalize_path, resolve_path};
