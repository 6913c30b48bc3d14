//! REST calls against the image backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): every call returns `ApiError::Unavailable`, since
//! requests are only issued from the browser.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ApiError::Status` carrying the backend's
//! `{"message"}` when it sent one, so pages can show it verbatim.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use gallery::api::{ANALYZE_PATH, IMAGES_PATH, LOGIN_PATH, REGISTER_PATH, UPLOAD_PATH};
use gallery::types::{LoginResponse, UploadReceipt};
use gallery::{ApiError, Credentials, ImageApi, ImageRecord, Token, UploadFile};

/// Backend base URL baked in at build time; empty means same origin.
pub const API_URL: &str = match option_env!("IMAGELENS_API_URL") {
    Some(url) => url,
    None => "",
};

/// `ImageApi` over the browser's `fetch`.
#[derive(Clone, Debug, Default)]
pub struct HttpApi {
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// API pointed at [`API_URL`].
    pub fn from_build_env() -> Self {
        Self::new(API_URL)
    }

    fn url(&self, path: &str) -> String {
        gallery::api::endpoint(&self.base_url, path)
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn status_error(status: u16, body: &str) -> ApiError {
    ApiError::Status {
        status,
        message: gallery::types::ErrorBody::message_from(body),
    }
}

#[cfg(feature = "hydrate")]
fn transport(e: gloo_net::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

#[cfg(feature = "hydrate")]
fn decode(e: gloo_net::Error) -> ApiError {
    ApiError::Decode(e.to_string())
}

#[cfg(feature = "hydrate")]
fn js_error(e: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Transport(format!("{e:?}"))
}

/// Pass 2xx responses through; turn anything else into `ApiError::Status`.
#[cfg(feature = "hydrate")]
async fn check(resp: gloo_net::http::Response) -> Result<gloo_net::http::Response, ApiError> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    log::warn!("{} answered {status}", resp.url());
    Err(status_error(status, &body))
}

#[cfg(feature = "hydrate")]
fn multipart(file: &UploadFile) -> Result<web_sys::FormData, ApiError> {
    let form = web_sys::FormData::new().map_err(js_error)?;
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = web_sys::BlobPropertyBag::new();
    if let Some(content_type) = &file.content_type {
        options.set_type(content_type);
    }
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;
    form.append_with_blob_and_filename(gallery::api::UPLOAD_FIELD, &blob, &file.name)
        .map_err(js_error)?;
    Ok(form)
}

#[async_trait(?Send)]
impl ImageApi for HttpApi {
    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&self.url(REGISTER_PATH))
                .json(credentials)
                .map_err(transport)?
                .send()
                .await
                .map_err(transport)?;
            check(resp).await?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (self.url(REGISTER_PATH), credentials);
            Err(ApiError::Unavailable)
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&self.url(LOGIN_PATH))
                .json(credentials)
                .map_err(transport)?
                .send()
                .await
                .map_err(transport)?;
            check(resp).await?.json::<LoginResponse>().await.map_err(decode)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (self.url(LOGIN_PATH), credentials);
            Err(ApiError::Unavailable)
        }
    }

    async fn list_images(&self, token: &Token) -> Result<Vec<ImageRecord>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&self.url(IMAGES_PATH))
                .header("Authorization", &gallery::api::bearer(token))
                .send()
                .await
                .map_err(transport)?;
            let body = check(resp)
                .await?
                .json::<gallery::types::ImageListResponse>()
                .await
                .map_err(decode)?;
            Ok(body.images)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (self.url(IMAGES_PATH), token);
            Err(ApiError::Unavailable)
        }
    }

    async fn upload_image(&self, token: &Token, file: &UploadFile) -> Result<UploadReceipt, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&self.url(UPLOAD_PATH))
                .header("Authorization", &gallery::api::bearer(token))
                .body(multipart(file)?)
                .map_err(transport)?
                .send()
                .await
                .map_err(transport)?;
            Ok(check(resp).await?.json::<UploadReceipt>().await.unwrap_or_default())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (self.url(UPLOAD_PATH), token, file);
            Err(ApiError::Unavailable)
        }
    }

    async fn analyze_image(&self, token: &Token, image_url: &str) -> Result<String, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(&self.url(ANALYZE_PATH))
                .header("Authorization", &gallery::api::bearer(token))
                .json(&gallery::types::AnalyzeRequest { image_url })
                .map_err(transport)?
                .send()
                .await
                .map_err(transport)?;
            let body = check(resp)
                .await?
                .json::<gallery::types::AnalyzeResponse>()
                .await
                .map_err(decode)?;
            Ok(body.analysis)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (self.url(ANALYZE_PATH), token, image_url);
            Err(ApiError::Unavailable)
        }
    }
}
