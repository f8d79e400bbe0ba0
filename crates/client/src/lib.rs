//! BitSpring API client.
//!
//! Each remote step is a free function over a [`Transport`], so the
//! workflow can be driven against `reqwest` in production and against
//! recording stubs in tests. [`ApiClient`] bundles them behind one handle.
//!
//! # Steps
//!
//! 1. **Authenticate**: `GET /v1/auth/session`, body is the token
//! 2. **Create space**: `POST /v1/spaces` with `{}`
//! 3. **Upload**: status 0%, multipart file, status 100%

pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod space;
pub mod status;
pub mod transport;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

// Re-export primary types for convenience.
pub use client::ApiClient;
pub use error::{ClientError, TransportError};
pub use http::HttpTransport;
pub use session::{Session, authenticate};
pub use space::create_space;
pub use status::report_status;
pub use transport::{Body, FilePart, Method, Request, Response, Transport};
pub use upload::upload_file;
