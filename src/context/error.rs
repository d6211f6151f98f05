//! Loading boundary errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to open `{}`: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    #[error("`{}` is outside the context scope `{}`", path.display(), scope.display())]
    OutOfScope { path: PathBuf, scope: PathBuf },

    #[error("missing entry symbol `{symbol}` in {}", path.display())]
    EntryMissing { path: PathBuf, symbol: &'static str },

    #[error("entry point of {} returned no module table", path.display())]
    NullEntry { path: PathBuf },

    #[error("abi version mismatch in {}: guest={guest}, host={host}", path.display())]
    AbiMismatch { path: PathBuf, guest: u32, host: u32 },

    #[error("root constructor failed: {0}")]
    Constructor(String),

    #[error("invalid root content: {0}")]
    Content(String),

    #[error("failed to close `{}`: {reason}", path.display())]
    Close { path: PathBuf, reason: String },
}

impl ContextError {
    /// Whether the guest failed the entry contract itself (as opposed to
    /// failing while honoring it).
    pub fn is_contract_unmet(&self) -> bool {
        matches!(
            self,
            Self::EntryMissing { .. } | Self::NullEntry { .. } | Self::AbiMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_classification() {
        let missing = ContextError::EntryMissing {
            path: PathBuf::from("/tmp/libx.so"),
            symbol: "hotframe_guest_entry",
        };
        assert!(missing.is_contract_unmet());
        assert!(missing.to_string().contains("hotframe_guest_entry"));

        assert!(!ContextError::Constructor("boom".into()).is_contract_unmet());
    }
}
