use serde::{Deserialize, Serialize};

/// `secondsRemaining` value meaning "not started, estimate unknown".
pub const SECONDS_REMAINING_UNKNOWN: i64 = i64::MAX;

/// A remote container holding one uploaded file.
///
/// `url` is relative to the web app's `/space/` route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub url: String,
}

/// Upload progress notification pushed to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatus {
    pub file_name: String,
    pub bytes_total: i64,
    pub bytes_uploaded: i64,
    pub seconds_remaining: i64,
}

impl UploadStatus {
    /// Checkpoint sent before any byte is transferred.
    pub fn started(file_name: impl Into<String>, bytes_total: i64) -> Self {
        Self {
            file_name: file_name.into(),
            bytes_total,
            bytes_uploaded: 0,
            seconds_remaining: SECONDS_REMAINING_UNKNOWN,
        }
    }

    /// Checkpoint sent once the whole file has been accepted.
    pub fn completed(file_name: impl Into<String>, bytes_total: i64) -> Self {
        Self {
            file_name: file_name.into(),
            bytes_total,
            bytes_uploaded: bytes_total,
            seconds_remaining: 0,
        }
    }

    /// Returns the upload progress as a percentage (0-100).
    pub fn percentage(&self) -> f64 {
        if self.bytes_total == 0 {
            return 0.0;
        }
        self.bytes_uploaded as f64 / self.bytes_total as f64 * 100.0
    }

    /// True once every byte has been reported.
    pub fn is_complete(&self) -> bool {
        self.bytes_uploaded >= self.bytes_total && self.seconds_remaining == 0
    }
}
