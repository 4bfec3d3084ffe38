//! OPD reference-data endpoints, including the bulk spreadsheet import.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};

use super::MessageResponse;
use crate::errors::AppError;
use crate::importer::parse_opd_sheet;
use crate::models::{CreateOpdRequest, ImportOpdResponse, Opd, UpdateOpdRequest};
use crate::AppState;

/// GET /api/opd - List all organizational units.
pub async fn list_opd(State(state): State<AppState>) -> Result<Json<Vec<Opd>>, AppError> {
    Ok(Json(state.repo.list_opd().await?))
}

/// GET /api/opd/:id - Get a single organizational unit.
pub async fn get_opd(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Opd>, AppError> {
    let opd = state
        .repo
        .get_opd(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("OPD not found".to_string()))?;
    Ok(Json(opd))
}

/// POST /api/opd - Create a new organizational unit.
pub async fn create_opd(
    State(state): State<AppState>,
    Json(request): Json<CreateOpdRequest>,
) -> Result<Json<Opd>, AppError> {
    if request.nama.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    Ok(Json(state.repo.create_opd(&request).await?))
}

/// PUT /api/opd/:id - Partially update an organizational unit.
pub async fn update_opd(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateOpdRequest>,
) -> Result<Json<Opd>, AppError> {
    if request.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }
    Ok(Json(state.repo.update_opd(&id, &request).await?))
}

/// DELETE /api/opd/:id - Delete an organizational unit.
pub async fn delete_opd(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.repo.delete_opd(&id).await?;
    Ok(Json(MessageResponse::new("OPD deleted")))
}

/// POST /api/opd/import - Bulk-import organizational units from a
/// spreadsheet. Rows with an empty name or an existing (nama, kategori) pair
/// are skipped; partial success is still success.
pub async fn import_opd(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportOpdResponse>, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut file_name = String::new();
    let mut kategori: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("file") => {
                file_name = field.file_name().unwrap_or_default().to_string();
                file_bytes = Some(field.bytes().await?.to_vec());
            }
            Some("kategori") => {
                kategori = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let Some(file_bytes) = file_bytes else {
        return Err(AppError::Validation("A file upload is required".to_string()));
    };
    let Some(kategori) = kategori.filter(|k| !k.trim().is_empty()) else {
        return Err(AppError::Validation("Field 'kategori' is required".to_string()));
    };
    if !file_name.ends_with(".xlsx") && !file_name.ends_with(".xls") {
        return Err(AppError::Validation(
            "File must be an Excel spreadsheet (.xlsx or .xls)".to_string(),
        ));
    }

    let rows = parse_opd_sheet(&file_bytes)?;

    let mut imported = 0i64;
    let mut skipped = 0i64;

    for row in rows {
        if row.nama.is_empty() {
            skipped += 1;
            continue;
        }
        if state
            .repo
            .find_opd_by_nama_kategori(&row.nama, &kategori)
            .await?
            .is_some()
        {
            skipped += 1;
            continue;
        }

        state
            .repo
            .create_opd(&CreateOpdRequest {
                nama: row.nama,
                kode: Some(row.kode),
                alamat: Some(row.alamat),
                jumlah_personil: Some(row.jumlah_personil),
                kategori: Some(kategori.clone()),
            })
            .await?;
        imported += 1;
    }

    tracing::info!("OPD import finished: {} imported, {} skipped", imported, skipped);

    Ok(Json(ImportOpdResponse {
        message: format!(
            "Import finished: {} added, {} skipped (duplicate/empty)",
            imported, skipped
        ),
        imported,
        skipped,
    }))
}
