//! Dependency resolution policy.
//!
//! Shared dependencies resolve once through the process loader and are
//! never duplicated. Private dependencies are snapshotted with the artifact
//! and opened by each generation's context.

/// Where a dependency resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Process loader, shared by every generation.
    Shared,
    /// The generation's own context.
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyPolicy {
    /// Lowercase file name prefixes of shared/platform libraries.
    shared_prefixes: Vec<String>,
}

impl DependencyPolicy {
    pub fn new(shared_prefixes: &[String]) -> Self {
        Self {
            shared_prefixes: shared_prefixes
                .iter()
                .map(|p| p.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Rust std dylib plus the usual platform C runtimes.
    pub fn default_shared_prefixes() -> Vec<String> {
        [
            "libstd-",
            "std-",
            "libc.",
            "libm.",
            "libdl.",
            "libpthread",
            "ld-linux",
            "libgcc_s",
            "libsystem",
            "kernel32",
            "ntdll",
            "msvcrt",
            "vcruntime",
            "ucrtbase",
            "api-ms-win",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn classify(&self, file_name: &str) -> Resolution {
        let name = file_name.to_ascii_lowercase();
        if self.shared_prefixes.iter().any(|p| name.starts_with(p)) {
            Resolution::Shared
        } else {
            Resolution::Private
        }
    }

    /// Names that must be snapshotted and opened per generation.
    pub fn private_only<'a>(&self, names: &'a [String]) -> Vec<&'a str> {
        names
            .iter()
            .map(String::as_str)
            .filter(|name| {
                let private = self.classify(name) == Resolution::Private;
                if !private {
                    crate::debug!("context"; "{} resolves through the process loader", name);
                }
                private
            })
            .collect()
    }
}

impl Default for DependencyPolicy {
    fn default() -> Self {
        Self::new(&Self::default_shared_prefixes())
    }
}
