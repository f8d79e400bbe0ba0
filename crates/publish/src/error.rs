//! Publish error types.

use std::path::PathBuf;
use std::time::Duration;

/// Errors from the document renderer.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("{0}")]
    Failed(String),

    #[error("renderer finished without signalling completion")]
    Abandoned,

    #[error("no completion signal after {0:?}")]
    TimedOut(Duration),

    #[error("renderer reported success but {} is missing", .0.display())]
    MissingOutput(PathBuf),
}

/// Errors produced by a publish operation.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Client(#[from] bitspring_client::ClientError),

    #[error("workspace error: {0}")]
    Workspace(#[from] bitspring_transfer::TransferError),

    #[error("invalid document path: {}", .0.display())]
    InvalidDocument(PathBuf),

    #[error("an upload for {0} is already in progress")]
    Busy(String),

    #[error("cancelled")]
    Cancelled,
}
