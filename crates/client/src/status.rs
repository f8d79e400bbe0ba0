//! Best-effort upload status notifications.

use bitspring_protocol::{UPLOAD_STATUS_PATH, UploadStatus};
use tracing::{debug, warn};

use crate::session::Session;
use crate::transport::{Request, Transport};

/// Pushes `status` to the service. Failures are logged, never returned.
pub async fn report_status(transport: &dyn Transport, session: &Session, status: &UploadStatus) {
    let body = match serde_json::to_value(status) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "failed to encode upload status");
            return;
        }
    };

    let req = Request::post(UPLOAD_STATUS_PATH)
        .authorized(session)
        .json(body);

    match transport.execute(req).await {
        Ok(resp) if resp.is_success() => {
            debug!(
                file = %status.file_name,
                uploaded = status.bytes_uploaded,
                total = status.bytes_total,
                complete = status.is_complete(),
                "status reported"
            );
        }
        Ok(resp) => {
            warn!(file = %status.file_name, status = resp.status, "status report rejected");
        }
        Err(e) => {
            warn!(file = %status.file_name, error = %e, "status report failed");
        }
    }
}
