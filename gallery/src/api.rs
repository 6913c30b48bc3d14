//! The backend HTTP contract and the trait frontends implement over it.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser app implements [`ImageApi`] with `gloo-net`, the CLI with
//! `reqwest`. Workflow code in [`crate::actions`] only ever talks to this
//! trait, so both frontends share one request sequencing.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;

use crate::session::Token;
use crate::types::{Credentials, ImageRecord, LoginResponse, UploadFile, UploadReceipt};

pub const REGISTER_PATH: &str = "/api/register";
pub const LOGIN_PATH: &str = "/api/login";
pub const IMAGES_PATH: &str = "/api/images";
pub const UPLOAD_PATH: &str = "/api/upload";
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Join a backend base URL and an API path. An empty base means same origin.
#[must_use]
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// `Authorization` header value for an authenticated call.
#[must_use]
pub fn bearer(token: &Token) -> String {
    format!("Bearer {}", token.as_str())
}

/// Failure of one backend request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The backend answered with a non-2xx status.
    #[error("{}", status_message(.status, .message))]
    Status { status: u16, message: Option<String> },
    /// A 2xx body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// This build cannot issue requests (server-side render).
    #[error("not available on server")]
    Unavailable,
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::ref_option)]
fn status_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("request failed with status {status}"),
    }
}

impl ApiError {
    /// Whether the backend rejected the bearer token itself.
    ///
    /// 401 covers expired/revoked tokens; the backend answers 422 for tokens
    /// it cannot parse.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 422, .. })
    }
}

/// Requests the client issues against the image backend.
///
/// Futures are not `Send`: the browser implementation runs on the single
/// WASM event loop.
#[async_trait(?Send)]
pub trait ImageApi {
    /// `POST /api/register`. The success body is ignored.
    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError>;

    /// `POST /api/login`.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// `GET /api/images` with the bearer token.
    async fn list_images(&self, token: &Token) -> Result<Vec<ImageRecord>, ApiError>;

    /// `POST /api/upload` as multipart field [`UPLOAD_FIELD`].
    async fn upload_image(&self, token: &Token, file: &UploadFile) -> Result<UploadReceipt, ApiError>;

    /// `POST /api/analyze` with `{image_url}`; returns the analysis text.
    async fn analyze_image(&self, token: &Token, image_url: &str) -> Result<String, ApiError>;
}
