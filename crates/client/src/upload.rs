//! Whole-file upload with start/finish status checkpoints.

use std::path::Path;

use bitspring_protocol::constants::PDF_CONTENT_TYPE;
use bitspring_protocol::{Space, UPLOAD_FILE_FIELD, UploadStatus, upload_path};
use tracing::{debug, info};

use crate::error::ClientError;
use crate::session::Session;
use crate::status::report_status;
use crate::transport::{FilePart, Request, Transport};

/// Uploads the file at `path` into `space` as `<display_name>.pdf`.
///
/// Reports a 0% status before reading and a 100% status after the service
/// accepts the file. The size in both reports comes from the filesystem.
/// Returns the number of bytes sent.
pub async fn upload_file(
    transport: &dyn Transport,
    session: &Session,
    space: &Space,
    path: &Path,
    display_name: &str,
) -> Result<u64, ClientError> {
    let size = tokio::fs::metadata(path)
        .await
        .map_err(|e| ClientError::Upload(format!("cannot stat {}: {e}", path.display())))?
        .len();
    let bytes_total = i64::try_from(size).unwrap_or(i64::MAX);

    report_status(transport, session, &UploadStatus::started(display_name, bytes_total)).await;

    let data = tokio::task::spawn_blocking({
        let path = path.to_path_buf();
        move || bitspring_transfer::read_file_to_end(&path)
    })
    .await
    .map_err(|e| ClientError::Upload(format!("task join error: {e}")))?
    .map_err(|e| ClientError::Upload(format!("cannot read {}: {e}", path.display())))?;

    let sent = data.len() as u64;
    debug!(space_id = %space.id, bytes = sent, "file buffered");

    let part = FilePart {
        field: UPLOAD_FILE_FIELD.to_string(),
        file_name: format!("{display_name}.pdf"),
        content_type: PDF_CONTENT_TYPE.to_string(),
        data,
    };
    let req = Request::post(upload_path(&space.id))
        .authorized(session)
        .file(part);

    let resp = transport
        .execute(req)
        .await
        .map_err(|e| ClientError::Upload(e.to_string()))?;
    if !resp.is_success() {
        return Err(ClientError::Upload(format!(
            "status {}: {}",
            resp.status,
            resp.text_lossy()
        )));
    }

    let done = UploadStatus::completed(display_name, bytes_total);
    report_status(transport, session, &done).await;

    info!(
        space_id = %space.id,
        bytes = sent,
        percent = done.percentage(),
        "upload complete"
    );
    Ok(sent)
}
