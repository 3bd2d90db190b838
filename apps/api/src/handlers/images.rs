use axum::Json;
use axum::extract::{Extension, Multipart, State};

use rally_application::ImageUpload;
use rally_core::{AppError, Principal};

use crate::dto::ImageUploadResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Accepts a multipart upload whose `file` field carries the image.
/// Other fields are ignored.
pub async fn upload_image_handler(
    State(state): State<AppState>,
    Extension(_user): Extension<Principal>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImageUploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| AppError::Validation(format!("malformed multipart body: {error}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .unwrap_or("upload")
            .to_owned();
        let content_type = field
            .content_type()
            .ok_or_else(|| {
                AppError::Validation("file part must declare a content type".to_owned())
            })?
            .to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|error| AppError::Validation(format!("failed to read file part: {error}")))?
            .to_vec();

        let url = state
            .image_service
            .upload(ImageUpload {
                filename,
                content_type,
                bytes,
            })
            .await?;

        return Ok(Json(ImageUploadResponse { url }));
    }

    Err(AppError::Validation("multipart field 'file' is required".to_owned()).into())
}
