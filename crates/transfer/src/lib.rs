//! Local artifact handling for the publish flow.
//!
//! - [`read_to_end`] buffers a whole stream, tolerating short reads.
//! - [`Workspace`] owns the per-operation temporary directory.

mod buffer;
mod validation;
mod workspace;

pub use buffer::{INITIAL_BUFFER_SIZE, read_file_to_end, read_to_end};
pub use validation::validate_file_name;
pub use workspace::Workspace;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid file name: {0}")]
    InvalidName(String),
}
