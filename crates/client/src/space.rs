//! Space provisioning.

use bitspring_protocol::{SPACES_PATH, Space};
use tracing::info;

use crate::error::ClientError;
use crate::session::Session;
use crate::transport::{Request, Transport};

/// Creates a new space. Requires a session from [`authenticate`](crate::authenticate).
pub async fn create_space(
    transport: &dyn Transport,
    session: &Session,
) -> Result<Space, ClientError> {
    let req = Request::post(SPACES_PATH)
        .authorized(session)
        .json(serde_json::json!({}));

    let resp = transport
        .execute(req)
        .await
        .map_err(|e| ClientError::Provision(e.to_string()))?;

    if !resp.is_success() {
        return Err(ClientError::Provision(format!(
            "status {}: {}",
            resp.status,
            resp.text_lossy()
        )));
    }

    let space: Space = serde_json::from_slice(&resp.body)
        .map_err(|e| ClientError::Provision(format!("malformed space: {e}")))?;
    if space.id.is_empty() {
        return Err(ClientError::Provision("space has no id".into()));
    }

    info!(space_id = %space.id, space_url = %space.url, "space created");
    Ok(space)
}
