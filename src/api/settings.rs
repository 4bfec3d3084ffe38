//! Site settings and image upload endpoints.

use axum::{
    extract::{Multipart, State},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::errors::AppError;
use crate::models::{Settings, UpdateSettingsRequest, UploadImageResponse, UploadLogoResponse};
use crate::AppState;

/// Maximum upload size for images and logos.
const MAX_FILE_SIZE: usize = 2 * 1024 * 1024;

/// GET /api/settings - Get the settings singleton, creating defaults on
/// first read.
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, AppError> {
    Ok(Json(state.repo.ensure_settings().await?))
}

/// PUT /api/settings - Partially update the settings singleton.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<Settings>, AppError> {
    Ok(Json(state.repo.update_settings(&request).await?))
}

/// POST /api/upload/image - Store an uploaded image as a base64 data URL
/// (public, used by the participation form for planting evidence).
pub async fn upload_image(
    mut multipart: Multipart,
) -> Result<Json<UploadImageResponse>, AppError> {
    let (content_type, bytes) = read_upload(&mut multipart).await?;

    if !content_type.starts_with("image/") {
        return Err(AppError::Validation("File must be an image".to_string()));
    }

    Ok(Json(UploadImageResponse {
        url: to_data_url(&content_type, &bytes),
    }))
}

/// POST /api/settings/upload-logo - Store the site logo on the settings
/// singleton as a base64 data URL.
pub async fn upload_logo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadLogoResponse>, AppError> {
    let (content_type, bytes) = read_upload(&mut multipart).await?;

    let logo_url = to_data_url(&content_type, &bytes);
    state.repo.set_logo(&logo_url).await?;

    Ok(Json(UploadLogoResponse { logo_url }))
}

/// Pull the `file` field out of a multipart upload and enforce the size cap.
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("image/png")
            .to_string();
        let bytes = field.bytes().await?.to_vec();

        if bytes.len() > MAX_FILE_SIZE {
            return Err(AppError::Validation(
                "File size must not exceed 2MB".to_string(),
            ));
        }
        return Ok((content_type, bytes));
    }

    Err(AppError::Validation("A file upload is required".to_string()))
}

fn to_data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, BASE64.encode(bytes))
}
