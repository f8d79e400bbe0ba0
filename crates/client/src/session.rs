//! Session acquisition.

use std::fmt;

use bitspring_protocol::AUTH_SESSION_PATH;
use reqwest::header::HeaderValue;
use tracing::debug;

use crate::error::ClientError;
use crate::transport::{Request, Transport};

/// Opaque authentication token, valid for one operation.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Raw token, sent verbatim as the `Authorization` header value.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

/// Requests a new session. The response body is the token, unparsed.
pub async fn authenticate(transport: &dyn Transport) -> Result<Session, ClientError> {
    let resp = transport
        .execute(Request::get(AUTH_SESSION_PATH))
        .await
        .map_err(|e| ClientError::Auth(e.to_string()))?;

    if !resp.is_success() {
        return Err(ClientError::Auth(format!(
            "status {}: {}",
            resp.status,
            resp.text_lossy()
        )));
    }

    let token = String::from_utf8(resp.body)
        .map_err(|_| ClientError::Auth("token is not valid UTF-8".into()))?;
    if token.trim().is_empty() {
        return Err(ClientError::Auth("empty session token".into()));
    }
    // Sent verbatim as the Authorization header of every later request.
    if HeaderValue::from_str(&token).is_err() {
        return Err(ClientError::Auth(
            "session token is not a valid header value".into(),
        ));
    }

    debug!(len = token.len(), "session acquired");
    Ok(Session::new(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::testing::StubTransport;
    use crate::transport::{Method, Response};

    #[tokio::test]
    async fn token_is_body_verbatim() {
        let stub = StubTransport::fixed(200, "tok1");
        let session = authenticate(&stub).await.unwrap();
        assert_eq!(session.token(), "tok1");

        let reqs = stub.requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].method, Method::Get);
        assert_eq!(reqs[0].path, "/v1/auth/session");
        assert!(reqs[0].authorization.is_none());
    }

    #[tokio::test]
    async fn token_whitespace_kept() {
        let stub = StubTransport::fixed(200, "\"abc def\"");
        let session = authenticate(&stub).await.unwrap();
        assert_eq!(session.token(), "\"abc def\"");
    }

    #[tokio::test]
    async fn error_status_is_auth_error() {
        let stub = StubTransport::fixed(401, "denied");
        let err = authenticate(&stub).await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(ref m) if m.contains("401")));
    }

    #[tokio::test]
    async fn empty_token_is_auth_error() {
        let stub = StubTransport::fixed(200, "  ");
        let err = authenticate(&stub).await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)));
    }

    #[tokio::test]
    async fn token_with_newline_is_auth_error() {
        let stub = StubTransport::fixed(200, "tok1\n");
        let err = authenticate(&stub).await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(ref m) if m.contains("header")));
    }

    #[tokio::test]
    async fn token_with_control_char_is_auth_error() {
        let stub = StubTransport::fixed(200, "tok\u{1}1");
        let err = authenticate(&stub).await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)));
    }

    #[tokio::test]
    async fn non_utf8_token_is_auth_error() {
        let stub = StubTransport::new(|_| Ok(Response::new(200, vec![0xff, 0xfe])));
        let err = authenticate(&stub).await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)));
    }

    #[tokio::test]
    async fn timeout_is_auth_error() {
        let stub = StubTransport::new(|_| Err(TransportError::Timeout));
        let err = authenticate(&stub).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn debug_redacts_token() {
        let dbg = format!("{:?}", Session::new("secret-token"));
        assert!(!dbg.contains("secret-token"));
    }
}
