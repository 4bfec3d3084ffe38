//! Aggregate statistics and progress endpoints.
//!
//! Both are computed per request by scanning the participation and OPD
//! tables; no result is cached.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::stats::{compute_progress, compute_stats, ProgressResponse, StatsResponse};
use crate::AppState;

/// GET /api/stats - Program-wide statistics.
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let partisipasi = state.repo.list_partisipasi().await?;
    let opd_list = state.repo.list_opd().await?;

    Ok(Json(compute_stats(&partisipasi, &opd_list)))
}

/// GET /api/progress - Per-OPD progress against the ten-trees-per-person
/// target.
pub async fn get_progress(
    State(state): State<AppState>,
) -> Result<Json<ProgressResponse>, AppError> {
    let partisipasi = state.repo.list_partisipasi().await?;
    let opd_list = state.repo.list_opd().await?;

    Ok(Json(compute_progress(&partisipasi, &opd_list)))
}
