use shared::domain::ArtifactKind;
use thiserror::Error;

use crate::transport::TransportError;

/// Local checks that fail before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("API key must not be empty")]
    EmptyApiKey,
    #[error("enter an API key and upload a workbook first")]
    MissingPrerequisites,
    #[error("unsupported file type for {name}; choose a .xlsx or .xls workbook")]
    UnsupportedFileType { name: String },
    #[error("file is {size} bytes; uploads are limited to {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("'{name}' is not a plain file name")]
    UnsafeArtifactName { name: String },
}

/// An action was triggered before the session reached the stage it needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("nothing to download: no {0} artifact has been produced yet")]
    NothingToDownload(ArtifactKind),
    #[error("no terminology-matched workbook is available to translate")]
    NoTerminologyMatch,
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("network error: {0}")]
    Network(#[from] TransportError),
    #[error("{0}")]
    ServerRejected(String),
    #[error("download failed: {0}")]
    Download(String),
}

impl ActionError {
    /// True when the action stopped before talking to the server.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::State(_))
    }
}
