//! News (berita) endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::MessageResponse;
use crate::errors::AppError;
use crate::models::{Berita, CreateBeritaRequest, UpdateBeritaRequest};
use crate::AppState;

/// GET /api/berita - List all news entries, newest first.
pub async fn list_berita(State(state): State<AppState>) -> Result<Json<Vec<Berita>>, AppError> {
    Ok(Json(state.repo.list_berita().await?))
}

/// GET /api/berita/active - List active news entries for the public popup.
pub async fn active_berita(State(state): State<AppState>) -> Result<Json<Vec<Berita>>, AppError> {
    Ok(Json(state.repo.list_active_berita().await?))
}

/// GET /api/berita/:id - Get a single news entry.
pub async fn get_berita(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Berita>, AppError> {
    let berita = state
        .repo
        .get_berita(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("News entry not found".to_string()))?;
    Ok(Json(berita))
}

/// POST /api/berita - Create a news entry.
pub async fn create_berita(
    State(state): State<AppState>,
    Json(request): Json<CreateBeritaRequest>,
) -> Result<Json<Berita>, AppError> {
    if request.judul.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    Ok(Json(state.repo.create_berita(&request).await?))
}

/// PUT /api/berita/:id - Partially update a news entry.
pub async fn update_berita(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBeritaRequest>,
) -> Result<Json<Berita>, AppError> {
    if request.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }
    Ok(Json(state.repo.update_berita(&id, &request).await?))
}

/// DELETE /api/berita/:id - Delete a news entry.
pub async fn delete_berita(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete_berita(&id).await?;
    Ok(Json(MessageResponse::new("News entry deleted")))
}
