//! Agenda endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::MessageResponse;
use crate::errors::AppError;
use crate::models::{Agenda, CreateAgendaRequest, UpdateAgendaRequest};
use crate::AppState;

/// GET /api/agenda - List all agenda items ordered by date.
pub async fn list_agenda(State(state): State<AppState>) -> Result<Json<Vec<Agenda>>, AppError> {
    Ok(Json(state.repo.list_agenda().await?))
}

/// GET /api/agenda/upcoming - List upcoming or ongoing agenda items.
pub async fn upcoming_agenda(
    State(state): State<AppState>,
) -> Result<Json<Vec<Agenda>>, AppError> {
    Ok(Json(state.repo.list_upcoming_agenda().await?))
}

/// POST /api/agenda - Create an agenda item.
pub async fn create_agenda(
    State(state): State<AppState>,
    Json(request): Json<CreateAgendaRequest>,
) -> Result<Json<Agenda>, AppError> {
    if request.nama_kegiatan.trim().is_empty() {
        return Err(AppError::Validation("Activity name is required".to_string()));
    }
    Ok(Json(state.repo.create_agenda(&request).await?))
}

/// PUT /api/agenda/:id - Partially update an agenda item.
pub async fn update_agenda(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAgendaRequest>,
) -> Result<Json<Agenda>, AppError> {
    if request.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }
    Ok(Json(state.repo.update_agenda(&id, &request).await?))
}

/// DELETE /api/agenda/:id - Delete an agenda item.
pub async fn delete_agenda(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete_agenda(&id).await?;
    Ok(Json(MessageResponse::new("Agenda item deleted")))
}
