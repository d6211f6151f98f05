//! Reload failure taxonomy.
//!
//! Every variant is recoverable. The orchestrator converts each into a
//! fallback message plus a status update; nothing propagates past it.

use std::path::PathBuf;

use thiserror::Error;

use crate::context::ContextError;
use crate::view::HostStatus;

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("artifact not found: {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("root type not found: {0}")]
    RootTypeNotFound(String),

    #[error("root instantiation failed: {0}")]
    RootInstantiationFailed(String),

    #[error("unexpected load failure: {0}")]
    UnexpectedLoadFailure(String),
}

impl ReloadError {
    /// Text shown in place of the guest content.
    pub fn fallback_message(&self) -> String {
        match self {
            Self::ArtifactMissing(_) => "App module not found. Build the app first.".to_string(),
            Self::RootTypeNotFound(detail)
            | Self::RootInstantiationFailed(detail)
            | Self::UnexpectedLoadFailure(detail) => format!("Load failed: {detail}"),
        }
    }

    pub fn status(&self) -> HostStatus {
        match self {
            Self::ArtifactMissing(_) => HostStatus::ArtifactMissing,
            _ => HostStatus::LoadFailed,
        }
    }
}

impl From<ContextError> for ReloadError {
    fn from(err: ContextError) -> Self {
        match err {
            e if e.is_contract_unmet() => Self::RootTypeNotFound(e.to_string()),
            ContextError::Constructor(reason) => Self::RootInstantiationFailed(reason),
            e => Self::UnexpectedLoadFailure(e.to_string()),
        }
    }
}
