use async_trait::async_trait;
use serde::Deserialize;

use rally_application::{ImageStore, ImageUpload};
use rally_core::{AppError, AppResult};

/// Configuration for the HTTP image store adapter.
#[derive(Debug, Clone)]
pub struct HttpImageStoreConfig {
    /// Upload endpoint of the external image storage service.
    pub upload_url: String,
    /// Optional API key sent as a bearer credential.
    pub api_key: Option<String>,
}

/// Image store adapter posting files to an external storage service that
/// answers with the public URL of the stored image.
pub struct HttpImageStore {
    http_client: reqwest::Client,
    config: HttpImageStoreConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

impl HttpImageStore {
    /// Creates a store with the provided HTTP client and configuration.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: HttpImageStoreConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

#[async_trait]
impl ImageStore for HttpImageStore {
    async fn store(&self, upload: ImageUpload) -> AppResult<String> {
        let mut request = self
            .http_client
            .post(self.config.upload_url.as_str())
            .query(&[("filename", upload.filename.as_str())])
            .header(reqwest::header::CONTENT_TYPE, upload.content_type.as_str())
            .body(upload.bytes);

        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|error| {
            AppError::Storage(format!("image upload request failed: {error}"))
        })?;

        if !response.status().is_success() {
            return Err(AppError::Storage(format!(
                "image store answered with status {}",
                response.status()
            )));
        }

        let body: UploadResponse = response.json().await.map_err(|error| {
            AppError::Storage(format!("malformed image store response: {error}"))
        })?;

        Ok(body.url)
    }
}
