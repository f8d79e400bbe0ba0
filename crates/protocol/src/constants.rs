use std::time::Duration;

/// Returns a fresh session token in the response body.
pub const AUTH_SESSION_PATH: &str = "/v1/auth/session";

/// Creates a new space from an empty JSON object.
pub const SPACES_PATH: &str = "/v1/spaces";

/// Accepts upload progress notifications. The trailing slash is part of the
/// route on the service side.
pub const UPLOAD_STATUS_PATH: &str = "/v1/upload/status/";

/// Multipart field name carrying the uploaded file.
pub const UPLOAD_FILE_FIELD: &str = "file";

/// Content type of every uploaded artifact.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Default API root of the BitSpring service.
pub const DEFAULT_API_BASE_URL: &str = "http://newsendit.hightail.com:8080/api";

/// Default root of the BitSpring web app that serves shared spaces.
pub const DEFAULT_WEB_APP_BASE_URL: &str = "http://newsendit.hightail.com:3000";

/// Timeout for a single API request (uploads included).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Upload endpoint for a provisioned space.
pub fn upload_path(space_id: &str) -> String {
    format!("/v1/upload/{space_id}")
}

/// Builds the user-facing link for a space.
///
/// A trailing slash on `web_app_base` is tolerated so the result never
/// contains `//space/`.
pub fn share_url(web_app_base: &str, space_url: &str) -> String {
    format!("{}/space/{}", web_app_base.trim_end_matches('/'), space_url)
}
