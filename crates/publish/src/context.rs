//! Per-operation context threaded through every workflow step.

use std::path::{Path, PathBuf};

use bitspring_transfer::Workspace;
use uuid::Uuid;

use crate::renderer::RenderJob;

/// Everything one publish operation knows about its inputs and artifacts.
///
/// Created once when the operation starts and passed by reference to each
/// later step; nothing here changes after construction.
#[derive(Debug, Clone)]
pub struct OperationContext {
    id: Uuid,
    document: PathBuf,
    workspace: Workspace,
}

impl OperationContext {
    pub fn new(id: Uuid, document: &Path, workspace: Workspace) -> Self {
        Self {
            id,
            document: document.to_path_buf(),
            workspace,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Logical file name: stem of the uploaded `<name>.pdf`.
    pub fn file_name(&self) -> &str {
        self.workspace.file_name()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.workspace.pdf_path()
    }

    /// Job description handed to the renderer.
    pub fn render_job(&self) -> RenderJob {
        RenderJob {
            document: self.document.clone(),
            output: self.workspace.pdf_path(),
            log_path: self.workspace.log_path(),
            title: self.file_name().to_string(),
        }
    }
}
