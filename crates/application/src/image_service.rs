use std::sync::Arc;

use async_trait::async_trait;

use rally_core::{AppError, AppResult};

/// Maximum accepted image payload: 10 MiB.
pub const MAX_IMAGE_BYTES: usize = 10 * 1_048_576;

/// An image payload submitted for storage.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original file name, used by the store for naming.
    pub filename: String,
    /// Declared media type; must be an `image/*` type.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// Port for the external image storage integration.
///
/// Storage behavior is not defined here; a failed upload surfaces as
/// `AppError::Storage`.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores an image and returns its public URL.
    async fn store(&self, upload: ImageUpload) -> AppResult<String>;
}

/// Application service validating image uploads before delegating to the
/// store.
#[derive(Clone)]
pub struct ImageService {
    store: Arc<dyn ImageStore>,
}

impl ImageService {
    /// Creates an image service from a store implementation.
    #[must_use]
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    /// Validates and stores an image, returning its public URL.
    ///
    /// Rejects non-image media types and payloads over
    /// [`MAX_IMAGE_BYTES`] with a validation error before any storage
    /// call.
    pub async fn upload(&self, upload: ImageUpload) -> AppResult<String> {
        if !upload.content_type.starts_with("image/") {
            return Err(AppError::Validation(format!(
                "file must be an image, got media type '{}'",
                upload.content_type
            )));
        }

        if upload.bytes.is_empty() {
            return Err(AppError::Validation("image file is empty".to_owned()));
        }

        if upload.bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::Validation(format!(
                "image must not exceed {MAX_IMAGE_BYTES} bytes"
            )));
        }

        self.store.store(upload).await
    }
}
