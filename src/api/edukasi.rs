//! Educational post endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::MessageResponse;
use crate::errors::AppError;
use crate::models::{CreateEdukasiRequest, Edukasi, UpdateEdukasiRequest};
use crate::AppState;

/// GET /api/edukasi - List all educational posts.
pub async fn list_edukasi(State(state): State<AppState>) -> Result<Json<Vec<Edukasi>>, AppError> {
    Ok(Json(state.repo.list_edukasi().await?))
}

/// POST /api/edukasi - Create an educational post.
pub async fn create_edukasi(
    State(state): State<AppState>,
    Json(request): Json<CreateEdukasiRequest>,
) -> Result<Json<Edukasi>, AppError> {
    if request.judul.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    Ok(Json(state.repo.create_edukasi(&request).await?))
}

/// PUT /api/edukasi/:id - Partially update an educational post.
pub async fn update_edukasi(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateEdukasiRequest>,
) -> Result<Json<Edukasi>, AppError> {
    if request.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }
    Ok(Json(state.repo.update_edukasi(&id, &request).await?))
}

/// DELETE /api/edukasi/:id - Delete an educational post.
pub async fn delete_edukasi(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete_edukasi(&id).await?;
    Ok(Json(MessageResponse::new("Educational post deleted")))
}
