//! Participation report export and bulk import endpoints.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::export::{render_excel, render_pdf, EXCEL_FILENAME, PDF_FILENAME};
use crate::importer::parse_partisipasi_sheet;
use crate::models::Partisipasi;
use crate::AppState;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Report returned by the participation bulk import.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportExcelResponse {
    pub imported: i64,
    pub errors: Vec<String>,
}

/// GET /api/export/excel - Download all participation records as an XLSX
/// workbook matching the import layout.
pub async fn export_excel(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (records, opd_names) = fetch_report_data(&state).await?;
    let bytes = render_excel(&records, &opd_names)?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", EXCEL_FILENAME),
            ),
        ],
        bytes,
    ))
}

/// GET /api/export/pdf - Download the participation report as a landscape
/// PDF table (first 100 records).
pub async fn export_pdf(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (records, opd_names) = fetch_report_data(&state).await?;
    let tanggal = chrono::Local::now().format("%d %B %Y").to_string();
    let bytes = render_pdf(&records, &opd_names, &tanggal)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", PDF_FILENAME),
            ),
        ],
        bytes,
    ))
}

/// POST /api/import/excel - Bulk-import participation records from a
/// spreadsheet. Rows with a blank name or an unknown OPD become per-row
/// errors; the rest are inserted.
pub async fn import_excel(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportExcelResponse>, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            file_bytes = Some(field.bytes().await?.to_vec());
        }
    }
    let Some(file_bytes) = file_bytes else {
        return Err(AppError::Validation("A file upload is required".to_string()));
    };

    let sheet = parse_partisipasi_sheet(&file_bytes)?;
    let mut errors = sheet.errors;

    // OPD names are matched case-insensitively against the reference data.
    let opd_ids: HashMap<String, String> = state
        .repo
        .list_opd()
        .await?
        .into_iter()
        .map(|o| (o.nama.to_lowercase(), o.id))
        .collect();

    let mut imported = 0i64;

    for row in sheet.rows {
        let Some(opd_id) = opd_ids.get(&row.opd_nama.to_lowercase()) else {
            errors.push(format!(
                "Row {}: OPD '{}' not found",
                row.row_number, row.opd_nama
            ));
            continue;
        };

        let record = Partisipasi {
            id: uuid::Uuid::new_v4().to_string(),
            email: Some(row.email),
            nama_lengkap: row.nama_lengkap,
            nip: Some(row.nip),
            opd_id: opd_id.clone(),
            opd_nama: None,
            alamat: Some(row.alamat),
            nomor_whatsapp: Some(row.nomor_whatsapp),
            jumlah_pohon: row.jumlah_pohon,
            jenis_pohon: row.jenis_pohon,
            sumber_bibit: Some(row.sumber_bibit),
            lokasi_tanam: Some(row.lokasi_tanam),
            titik_lokasi: Some(row.titik_lokasi),
            bukti_url: None,
            lokasi_list: row.lokasi_list,
            status: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        state.repo.insert_partisipasi(&record).await?;
        imported += 1;
    }

    tracing::info!(
        "Participation import finished: {} imported, {} errors",
        imported,
        errors.len()
    );

    Ok(Json(ImportExcelResponse { imported, errors }))
}

async fn fetch_report_data(
    state: &AppState,
) -> Result<(Vec<Partisipasi>, HashMap<String, String>), AppError> {
    let records = state.repo.list_partisipasi().await?;
    let opd_names = state
        .repo
        .list_opd()
        .await?
        .into_iter()
        .map(|o| (o.id, o.nama))
        .collect();
    Ok((records, opd_names))
}
