//! Transport abstraction.
//!
//! `Transport` is the only seam between the API steps and the network.
//! It carries no business logic: it sends what it is given and hands back
//! the raw status and body.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::error::TransportError;
use crate::session::Session;

/// Sends API requests relative to a fixed base URL.
pub trait Transport: Send + Sync {
    /// Executes one request and returns the raw response.
    ///
    /// Non-success HTTP statuses are returned as a [`Response`], not an error.
    fn execute(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send + '_>>;
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A single file sent as a multipart form part.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    /// Sent with `Content-Type: application/json`.
    Json(serde_json::Value),
    /// Sent as `multipart/form-data` with one part.
    File(FilePart),
}

/// An API request. `path` is relative to the transport's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Body,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            authorization: None,
            body: Body::Empty,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            authorization: None,
            body: Body::Empty,
        }
    }

    /// Sets the `Authorization` header to the raw session token.
    pub fn authorized(mut self, session: &Session) -> Self {
        self.authorization = Some(session.token().to_string());
        self
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = Body::Json(value);
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.body = Body::File(part);
        self
    }
}

/// Raw API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8. Meant for error messages.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let session = Session::new("tok1");
        let req = Request::post("/v1/spaces")
            .authorized(&session)
            .json(serde_json::json!({}));
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "/v1/spaces");
        assert_eq!(req.authorization.as_deref(), Some("tok1"));
        assert_eq!(req.body, Body::Json(serde_json::json!({})));
    }

    #[test]
    fn get_has_no_body_or_auth() {
        let req = Request::get("/v1/auth/session");
        assert_eq!(req.method, Method::Get);
        assert!(req.authorization.is_none());
        assert_eq!(req.body, Body::Empty);
    }

    #[test]
    fn response_success_range() {
        assert!(Response::new(200, "").is_success());
        assert!(Response::new(204, "").is_success());
        assert!(!Response::new(199, "").is_success());
        assert!(!Response::new(301, "").is_success());
        assert!(!Response::new(500, "").is_success());
    }

    #[test]
    fn file_part_debug_omits_data() {
        let part = FilePart {
            field: "file".into(),
            file_name: "plan.pdf".into(),
            content_type: "application/pdf".into(),
            data: vec![7; 1024],
        };
        let dbg = format!("{part:?}");
        assert!(dbg.contains("len: 1024"));
        assert!(!dbg.contains("7, 7"));
    }
}
