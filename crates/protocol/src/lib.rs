//! Wire types and endpoint paths for the BitSpring REST API.

pub mod constants;
pub mod types;

// Re-export primary types for convenience.
pub use constants::{
    AUTH_SESSION_PATH, SPACES_PATH, UPLOAD_FILE_FIELD, UPLOAD_STATUS_PATH, share_url, upload_path,
};
pub use types::{SECONDS_REMAINING_UNKNOWN, Space, UploadStatus};
