//! Wire DTOs for the image backend.
//!
//! DESIGN
//! ======
//! These mirror the backend's JSON bodies. Decoding is lenient where the
//! backend is: the storage path arrives as `path` or `file_name`, and the
//! upload receipt is free-form.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Email + password pair sent to `/api/login` and `/api/register`.
///
/// Held only for the duration of one request.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Successful `/api/login` body.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// One uploaded image as shown in the workspace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Presigned URL used for thumbnails and sent to `/api/analyze`.
    pub url: String,
    /// Backend storage key. Stable across list fetches, unlike `url`.
    #[serde(rename = "path", alias = "file_name")]
    pub storage_path: String,
    /// Analysis text, filled in after a successful analyze call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

/// Successful `/api/images` body.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ImageListResponse {
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

/// `/api/analyze` request body.
#[derive(Clone, Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub image_url: &'a str,
}

/// Successful `/api/analyze` body.
#[derive(Clone, Debug, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

/// Successful `/api/upload` body. Every field is optional; callers re-list
/// rather than trusting it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub uploaded_path: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extract `message` from a raw response body, if it is JSON and has one.
    #[must_use]
    pub fn message_from(raw: &str) -> Option<String> {
        serde_json::from_str::<Self>(raw)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
    }
}

/// A file chosen for upload, read fully into memory.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
