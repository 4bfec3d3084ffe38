//! Gallery endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::MessageResponse;
use crate::errors::AppError;
use crate::models::{CreateGalleryRequest, GalleryItem};
use crate::AppState;

/// GET /api/gallery - List all gallery items.
pub async fn list_gallery(
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryItem>>, AppError> {
    Ok(Json(state.repo.list_gallery().await?))
}

/// POST /api/gallery - Add a gallery item.
pub async fn create_gallery(
    State(state): State<AppState>,
    Json(request): Json<CreateGalleryRequest>,
) -> Result<Json<GalleryItem>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    Ok(Json(state.repo.create_gallery(&request).await?))
}

/// DELETE /api/gallery/:id - Delete a gallery item.
pub async fn delete_gallery(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete_gallery(&id).await?;
    Ok(Json(MessageResponse::new("Gallery item deleted")))
}
