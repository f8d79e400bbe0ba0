//! `reqwest`-backed transport.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::error::TransportError;
use crate::transport::{Body, Method, Request, Response, Transport};

/// Async HTTP transport rooted at the API base URL.
///
/// Every request, uploads included, is bounded by the configured timeout.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for `base_url` (e.g. `http://host:8080/api`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };

        if let Some(token) = &request.authorization {
            let value =
                HeaderValue::from_str(token).map_err(|_| TransportError::InvalidHeader("Authorization"))?;
            builder = builder.header(AUTHORIZATION, value);
        }

        builder = match request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::File(file) => {
                let part = Part::bytes(file.data)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)?;
                builder.multipart(Form::new().part(file.field, part))
            }
        };

        let resp = builder.send().await.map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(classify)?.to_vec();

        debug!(method = ?request.method, path = %request.path, status, "api request");
        Ok(Response { status, body })
    }
}

impl Transport for HttpTransport {
    fn execute(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send + '_>> {
        Box::pin(self.send(request))
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Http(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::transport::FilePart;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Reads one HTTP/1.1 request, honoring Content-Length or chunked bodies.
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            if head.contains("transfer-encoding: chunked") {
                if buf.ends_with(b"0\r\n\r\n") {
                    break;
                }
                continue;
            }
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Starts a one-shot mock server; the handle yields the captured request.
    async fn mock_server(status: u16, body: &str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/api");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let captured = read_request(&mut stream).await;
            let resp = format!(
                "HTTP/1.1 {status} Mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes()).await;
            let _ = stream.shutdown().await;
            captured
        });

        (url, handle)
    }

    #[tokio::test]
    async fn get_returns_body_verbatim() {
        let (url, handle) = mock_server(200, "tok1").await;
        let transport = HttpTransport::new(url, Duration::from_secs(5)).unwrap();

        let resp = transport
            .execute(Request::get("/v1/auth/session"))
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, b"tok1");

        let captured = handle.await.unwrap();
        assert!(captured.starts_with("GET /api/v1/auth/session HTTP/1.1"));
    }

    #[tokio::test]
    async fn post_json_sends_auth_and_content_type() {
        let (url, handle) = mock_server(200, r#"{"id":"42","url":"abc"}"#).await;
        let transport = HttpTransport::new(url, Duration::from_secs(5)).unwrap();

        let req = Request::post("/v1/spaces")
            .authorized(&Session::new("tok1"))
            .json(serde_json::json!({}));
        let resp = transport.execute(req).await.unwrap();
        assert!(resp.is_success());

        let captured = handle.await.unwrap().to_lowercase();
        assert!(captured.starts_with("post /api/v1/spaces http/1.1"));
        assert!(captured.contains("authorization: tok1"));
        assert!(captured.contains("content-type: application/json"));
        assert!(captured.ends_with("{}"));
    }

    #[tokio::test]
    async fn multipart_upload_names_file_part() {
        let (url, handle) = mock_server(200, "").await;
        let transport = HttpTransport::new(url, Duration::from_secs(5)).unwrap();

        let req = Request::post("/v1/upload/42")
            .authorized(&Session::new("tok1"))
            .file(FilePart {
                field: "file".into(),
                file_name: "plan.pdf".into(),
                content_type: "application/pdf".into(),
                data: b"%PDF-1.4 test".to_vec(),
            });
        transport.execute(req).await.unwrap();

        let captured = handle.await.unwrap();
        let lower = captured.to_lowercase();
        assert!(lower.contains("content-type: multipart/form-data"));
        assert!(captured.contains(r#"name="file"; filename="plan.pdf""#));
        assert!(captured.contains("%PDF-1.4 test"));
    }

    #[tokio::test]
    async fn error_status_is_a_response() {
        let (url, _handle) = mock_server(500, "boom").await;
        let transport = HttpTransport::new(url, Duration::from_secs(5)).unwrap();

        let resp = transport
            .execute(Request::get("/v1/auth/session"))
            .await
            .unwrap();
        assert_eq!(resp.status, 500);
        assert!(!resp.is_success());
        assert_eq!(resp.text_lossy(), "boom");
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let _server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(stream);
        });

        let transport =
            HttpTransport::new(format!("http://127.0.0.1:{port}"), Duration::from_millis(200))
                .unwrap();
        let err = transport
            .execute(Request::get("/v1/auth/session"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Timeout));
    }

    #[tokio::test]
    async fn invalid_token_rejected_before_sending() {
        let transport =
            HttpTransport::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let req = Request::get("/x").authorized(&Session::new("bad\ntoken"));
        let err = transport.execute(req).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidHeader("Authorization")));
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let transport = HttpTransport::new("http://host/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.base_url(), "http://host/api");
    }
}
