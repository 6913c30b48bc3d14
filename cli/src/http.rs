//! `ImageApi` over `reqwest`.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures become `ApiError::Transport`; non-2xx answers become
//! `ApiError::Status` with the backend's `{"message"}` when present.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use async_trait::async_trait;
use gallery::api::{ANALYZE_PATH, IMAGES_PATH, LOGIN_PATH, REGISTER_PATH, UPLOAD_FIELD, UPLOAD_PATH, bearer, endpoint};
use gallery::types::{AnalyzeRequest, AnalyzeResponse, ErrorBody, ImageListResponse, LoginResponse, UploadReceipt};
use gallery::{ApiError, Credentials, ImageApi, ImageRecord, Token, UploadFile};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};

#[derive(Clone, Debug)]
pub struct ReqwestApi {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }
}

fn status_error(status: u16, body: &str) -> ApiError {
    ApiError::Status {
        status,
        message: ErrorBody::message_from(body),
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

fn decode(e: reqwest::Error) -> ApiError {
    ApiError::Decode(e.to_string())
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    tracing::warn!(%url, status = status.as_u16(), "backend rejected request");
    Err(status_error(status.as_u16(), &body))
}

fn multipart(file: &UploadFile) -> Result<Form, ApiError> {
    let mut part = Part::bytes(file.bytes.clone()).file_name(file.name.clone());
    if let Some(content_type) = &file.content_type {
        part = part.mime_str(content_type).map_err(transport)?;
    }
    Ok(Form::new().part(UPLOAD_FIELD, part))
}

#[async_trait(?Send)]
impl ImageApi for ReqwestApi {
    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let resp = self
            .client
            .post(self.url(REGISTER_PATH))
            .json(credentials)
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let resp = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(credentials)
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?.json().await.map_err(decode)
    }

    async fn list_images(&self, token: &Token) -> Result<Vec<ImageRecord>, ApiError> {
        let resp = self
            .client
            .get(self.url(IMAGES_PATH))
            .header(AUTHORIZATION, bearer(token))
            .send()
            .await
            .map_err(transport)?;
        let body: ImageListResponse = check(resp).await?.json().await.map_err(decode)?;
        Ok(body.images)
    }

    async fn upload_image(&self, token: &Token, file: &UploadFile) -> Result<UploadReceipt, ApiError> {
        let resp = self
            .client
            .post(self.url(UPLOAD_PATH))
            .header(AUTHORIZATION, bearer(token))
            .multipart(multipart(file)?)
            .send()
            .await
            .map_err(transport)?;
        Ok(check(resp).await?.json().await.unwrap_or_default())
    }

    async fn analyze_image(&self, token: &Token, image_url: &str) -> Result<String, ApiError> {
        let resp = self
            .client
            .post(self.url(ANALYZE_PATH))
            .header(AUTHORIZATION, bearer(token))
            .json(&AnalyzeRequest { image_url })
            .send()
            .await
            .map_err(transport)?;
        let body: AnalyzeResponse = check(resp).await?.json().await.map_err(decode)?;
        Ok(body.analysis)
    }
}
