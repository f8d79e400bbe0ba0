//! Client error types.

/// Errors raised by a [`Transport`](crate::Transport) before a response exists.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),
}

/// Errors produced by the API steps, one variant per step kind.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("space provisioning failed: {0}")]
    Provision(String),

    #[error("upload failed: {0}")]
    Upload(String),
}
