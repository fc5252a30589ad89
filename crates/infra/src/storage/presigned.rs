//! Upload to pre-signed object-storage URLs
//!
//! The file is read into memory and sent with a single `PUT`. Pre-signed
//! URLs are single-use, so the transfer is never retried.

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use scanbridge_core::ObjectStorage;
use scanbridge_domain::{truncate_body, UploadError};
use tracing::{debug, info, instrument};

use crate::errors::HttpErrorExt;
use crate::http::HttpClient;

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// [`ObjectStorage`] backed by plain HTTP `PUT` requests.
#[derive(Clone)]
pub struct PresignedUploader {
    http: HttpClient,
    content_type: Option<String>,
}

impl PresignedUploader {
    pub fn new(http: HttpClient) -> Self {
        Self { http, content_type: Some(DEFAULT_CONTENT_TYPE.to_string()) }
    }

    /// Override the `Content-Type` header; `None` sends no header, which some
    /// signatures require.
    #[must_use]
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }
}

#[async_trait]
impl ObjectStorage for PresignedUploader {
    #[instrument(skip_all, fields(file = %path.display()))]
    async fn upload(&self, url: &str, path: &Path) -> Result<(), UploadError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| UploadError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let size = bytes.len();
        debug!(size, "uploading file");

        let mut request = self.http.request(Method::PUT, url).body(bytes);
        if let Some(content_type) = &self.content_type {
            request = request.header(CONTENT_TYPE, content_type.as_str());
        }

        let response = self.http.send_once(request).await.map_err(HttpErrorExt::into_upload)?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(UploadError::Rejected { status: status.as_u16(), body: truncate_body(&body) });
        }

        info!(size, %status, "file uploaded");
        Ok(())
    }
}
