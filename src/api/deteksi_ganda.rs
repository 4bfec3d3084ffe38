//! Duplicate detection, bulk cleanup, and merge endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::MergeDuplicatesRequest;
use crate::stats::{group_duplicates, DuplicateField, DuplicateGroup};
use crate::AppState;

/// Query parameters for the duplicate scan.
#[derive(Debug, Deserialize)]
pub struct DuplicateQuery {
    #[serde(default = "default_field")]
    pub field: String,
    #[serde(default)]
    pub opd_id: Option<String>,
}

fn default_field() -> String {
    "nama_lengkap".to_string()
}

/// Response body for the duplicate scan.
#[derive(Debug, Serialize, Deserialize)]
pub struct DuplicatesResponse {
    pub field: String,
    pub total_groups: i64,
    pub total_duplicates: i64,
    pub duplicates: Vec<DuplicateGroup>,
}

/// Response body for the bulk delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    pub success: bool,
    pub deleted_count: i64,
    pub message: String,
}

/// Response body for the merge.
#[derive(Debug, Serialize, Deserialize)]
pub struct MergeResponse {
    pub success: bool,
    pub primary_id: String,
    pub merged_count: i64,
    pub new_total_trees: i64,
    pub total_locations: i64,
    pub message: String,
}

/// GET /api/deteksi-ganda - Group participation records by an identifying
/// field and return the groups with more than one member.
pub async fn get_duplicates(
    State(state): State<AppState>,
    Query(query): Query<DuplicateQuery>,
) -> Result<Json<DuplicatesResponse>, AppError> {
    let field = DuplicateField::parse(&query.field).ok_or_else(|| {
        AppError::Validation(
            "Field must be one of: nama_lengkap, nip, nomor_whatsapp".to_string(),
        )
    })?;

    let opd_filter = query
        .opd_id
        .as_deref()
        .filter(|opd_id| !opd_id.is_empty() && *opd_id != "all");

    let partisipasi = state.repo.list_partisipasi().await?;
    let opd_list = state.repo.list_opd().await?;

    let duplicates = group_duplicates(&partisipasi, field, opd_filter, &opd_list);
    let total_duplicates = duplicates.iter().map(|g| g.count).sum();

    Ok(Json(DuplicatesResponse {
        field: field.as_str().to_string(),
        total_groups: duplicates.len() as i64,
        total_duplicates,
        duplicates,
    }))
}

/// DELETE /api/deteksi-ganda/hapus - Delete several participation records at
/// once. Missing ids are skipped silently; the count reflects rows actually
/// removed.
pub async fn delete_duplicates(
    State(state): State<AppState>,
    Json(ids): Json<Vec<String>>,
) -> Result<Json<BulkDeleteResponse>, AppError> {
    if ids.is_empty() {
        return Err(AppError::Validation("No ids provided".to_string()));
    }

    let mut deleted_count = 0i64;
    for id in &ids {
        if state.repo.delete_partisipasi_if_exists(id).await? {
            deleted_count += 1;
        }
    }

    Ok(Json(BulkDeleteResponse {
        success: true,
        deleted_count,
        message: format!("Deleted {} records", deleted_count),
    }))
}

/// POST /api/deteksi-ganda/gabung - Merge duplicate records into the primary:
/// tree counts are summed, location lists concatenated (secondary order
/// preserved), and each found secondary deleted. The delete-then-update
/// sequence is not atomic.
pub async fn merge_duplicates(
    State(state): State<AppState>,
    Json(request): Json<MergeDuplicatesRequest>,
) -> Result<Json<MergeResponse>, AppError> {
    if request.primary_id.is_empty() || request.secondary_ids.is_empty() {
        return Err(AppError::Validation(
            "primary_id and secondary_ids are required".to_string(),
        ));
    }

    let primary = state
        .repo
        .get_partisipasi(&request.primary_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Primary record not found".to_string()))?;

    let mut merged_lokasi = primary.effective_lokasi();
    let mut added_trees = 0i64;

    for secondary_id in &request.secondary_ids {
        let Some(secondary) = state.repo.get_partisipasi(secondary_id).await? else {
            continue;
        };
        added_trees += secondary.jumlah_pohon;
        merged_lokasi.extend(secondary.effective_lokasi());
        state.repo.delete_partisipasi_if_exists(secondary_id).await?;
    }

    let new_total_trees = primary.jumlah_pohon + added_trees;
    state
        .repo
        .apply_merge(&request.primary_id, new_total_trees, &merged_lokasi)
        .await?;

    tracing::info!(
        "Merged {} records into {}",
        request.secondary_ids.len(),
        request.primary_id
    );

    Ok(Json(MergeResponse {
        success: true,
        primary_id: request.primary_id.clone(),
        merged_count: request.secondary_ids.len() as i64,
        new_total_trees,
        total_locations: merged_lokasi.len() as i64,
        message: format!(
            "Merged {} records into the primary record",
            request.secondary_ids.len()
        ),
    }))
}
