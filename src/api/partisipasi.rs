//! Participation record endpoints.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};

use super::MessageResponse;
use crate::errors::AppError;
use crate::models::{
    is_valid_email, CreatePartisipasiRequest, Partisipasi, UpdatePartisipasiRequest,
};
use crate::AppState;

/// GET /api/partisipasi - List all participation records, enriched with OPD
/// names via a single OPD fetch.
pub async fn list_partisipasi(
    State(state): State<AppState>,
) -> Result<Json<Vec<Partisipasi>>, AppError> {
    let mut records = state.repo.list_partisipasi().await?;

    let opd_names: HashMap<String, String> = state
        .repo
        .list_opd()
        .await?
        .into_iter()
        .map(|o| (o.id, o.nama))
        .collect();

    for record in &mut records {
        record.opd_nama = Some(
            opd_names
                .get(&record.opd_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
        );
    }

    Ok(Json(records))
}

/// GET /api/partisipasi/:id - Get a single participation record.
pub async fn get_partisipasi(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Partisipasi>, AppError> {
    let mut record = state
        .repo
        .get_partisipasi(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Participation record not found".to_string()))?;

    let opd = state.repo.get_opd(&record.opd_id).await?;
    record.opd_nama = Some(opd.map(|o| o.nama).unwrap_or_else(|| "Unknown".to_string()));

    Ok(Json(record))
}

/// POST /api/partisipasi - Submit a participation record (public). The
/// referenced OPD must exist; either the legacy single location or a
/// location list may be supplied.
pub async fn create_partisipasi(
    State(state): State<AppState>,
    Json(request): Json<CreatePartisipasiRequest>,
) -> Result<Json<Partisipasi>, AppError> {
    if request.nama_lengkap.trim().is_empty() {
        return Err(AppError::Validation("Full name is required".to_string()));
    }
    if let Some(email) = request.email.as_deref() {
        if !email.is_empty() && !is_valid_email(email) {
            return Err(AppError::Validation("Email format is not valid".to_string()));
        }
    }

    let opd = state
        .repo
        .get_opd(&request.opd_id)
        .await?
        .ok_or_else(|| AppError::Validation("OPD not found".to_string()))?;

    let mut record = state.repo.create_partisipasi(&request).await?;
    record.opd_nama = Some(opd.nama);

    Ok(Json(record))
}

/// PUT /api/partisipasi/:id - Partially update a participation record.
pub async fn update_partisipasi(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePartisipasiRequest>,
) -> Result<Json<Partisipasi>, AppError> {
    if request.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }

    let mut record = state.repo.update_partisipasi(&id, &request).await?;

    let opd = state.repo.get_opd(&record.opd_id).await?;
    record.opd_nama = Some(opd.map(|o| o.nama).unwrap_or_else(|| "Unknown".to_string()));

    Ok(Json(record))
}

/// DELETE /api/partisipasi/:id - Delete a participation record.
pub async fn delete_partisipasi(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete_partisipasi(&id).await?;
    Ok(Json(MessageResponse::new("Participation record deleted")))
}
