//! Per-operation temporary directory.
//!
//! Layout: `<temp>/<root>/<file_name>/`, holding `<file_name>.pdf` plus
//! whatever side files the renderer writes (logs, job descriptors).

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{TransferError, validate_file_name};

/// Temporary working directory owned by one in-flight operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    dir: PathBuf,
    file_name: String,
}

impl Workspace {
    /// Creates (if needed) the workspace directory for `file_name`.
    pub fn create(temp_dir: &Path, root: &str, file_name: &str) -> Result<Self, TransferError> {
        validate_file_name(root)?;
        validate_file_name(file_name)?;

        let dir = temp_dir.join(root).join(file_name);
        std::fs::create_dir_all(&dir)?;
        debug!(dir = %dir.display(), "workspace ready");

        Ok(Self {
            dir,
            file_name: file_name.to_string(),
        })
    }

    /// Directory holding every artifact of the operation.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Logical file name (no extension).
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Where the renderer must write the PDF.
    pub fn pdf_path(&self) -> PathBuf {
        self.dir.join(format!("{}.pdf", self.file_name))
    }

    /// Where the renderer may write its log.
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(format!("{}-Log.txt", self.file_name))
    }

    /// Number of regular files currently in the workspace.
    pub fn file_count(&self) -> Result<usize, TransferError> {
        let mut count = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            if entry?.file_type()?.is_file() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Deletes every regular file in the workspace, not just the PDF.
    ///
    /// Keeps going past individual failures and returns the first error
    /// after the sweep. Returns the number of files removed.
    pub fn clear(&self) -> Result<usize, TransferError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        let mut first_err = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove temp file");
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }

        debug!(dir = %self.dir.display(), removed, "workspace cleared");
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(removed),
        }
    }
}
