//! Host application seam.

use std::path::PathBuf;

/// Capabilities the publish flow borrows from the host application.
///
/// Implementations must be cheap and non-blocking; they are called from
/// the async workflow.
pub trait Host: Send + Sync {
    /// Writes a progress line to the host's command output.
    fn write_message(&self, text: &str);

    /// Shows an error prominently (message box or equivalent).
    fn show_error(&self, text: &str);

    /// Opens `url` in the default browser.
    fn open_in_browser(&self, url: &str) -> std::io::Result<()>;

    /// Root for temporary files.
    fn temp_directory(&self) -> PathBuf;
}
