//! Shared handle over a transport.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bitspring_protocol::{Space, UploadStatus};
use tracing::debug;

use crate::error::{ClientError, TransportError};
use crate::http::HttpTransport;
use crate::session::Session;
use crate::transport::Transport;

/// BitSpring API client. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Wraps an arbitrary transport (stubs in tests).
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Creates a client over [`HttpTransport`].
    pub fn http(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(base_url, timeout)?;
        debug!(base_url = transport.base_url(), ?timeout, "api client ready");
        Ok(Self::new(Arc::new(transport)))
    }

    pub async fn authenticate(&self) -> Result<Session, ClientError> {
        crate::session::authenticate(self.transport.as_ref()).await
    }

    pub async fn create_space(&self, session: &Session) -> Result<Space, ClientError> {
        crate::space::create_space(self.transport.as_ref(), session).await
    }

    pub async fn report_status(&self, session: &Session, status: &UploadStatus) {
        crate::status::report_status(self.transport.as_ref(), session, status).await
    }

    pub async fn upload(
        &self,
        session: &Session,
        space: &Space,
        path: &Path,
        display_name: &str,
    ) -> Result<u64, ClientError> {
        crate::upload::upload_file(self.transport.as_ref(), session, space, path, display_name)
            .await
    }
}
