//! XLSX import parsing for OPD reference data and participation records.
//!
//! Parsing is separated from persistence so the handlers can apply the
//! soft-error semantics of bulk imports: structurally broken rows become
//! per-row error strings instead of aborting the batch.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};

use crate::errors::AppError;
use crate::models::LokasiTanam;

/// One parsed OPD row. `nama` may be empty; the handler counts such rows as
/// skipped.
#[derive(Debug, Clone)]
pub struct OpdImportRow {
    pub nama: String,
    pub kode: String,
    pub alamat: String,
    pub jumlah_personil: i64,
}

/// Parse an OPD spreadsheet. Header names are normalized (lowercase,
/// trimmed); a `nama` column is required, `kode`, `alamat`, and
/// `jumlah_personil` are optional.
pub fn parse_opd_sheet(bytes: &[u8]) -> Result<Vec<OpdImportRow>, AppError> {
    let range = open_first_sheet(bytes)?;
    let mut rows = range.rows();

    let headers = normalized_headers(rows.next().unwrap_or(&[]));
    let nama_idx = headers
        .iter()
        .position(|h| h == "nama")
        .ok_or_else(|| AppError::Validation("Column 'nama' is required in the spreadsheet".to_string()))?;
    let kode_idx = headers.iter().position(|h| h == "kode");
    let alamat_idx = headers.iter().position(|h| h == "alamat");
    let personil_idx = headers.iter().position(|h| h == "jumlah_personil");

    let parsed = rows
        .map(|row| OpdImportRow {
            nama: cell_string(row, nama_idx).trim().to_string(),
            kode: kode_idx.map(|i| cell_string(row, i).trim().to_string()).unwrap_or_default(),
            alamat: alamat_idx
                .map(|i| cell_string(row, i).trim().to_string())
                .unwrap_or_default(),
            jumlah_personil: personil_idx.map(|i| cell_i64(row, i)).unwrap_or(0),
        })
        .collect();

    Ok(parsed)
}

/// One parsed participation row, ready for OPD-name resolution and insertion.
#[derive(Debug, Clone)]
pub struct PartisipasiImportRow {
    /// 1-based spreadsheet row number, for error reporting.
    pub row_number: usize,
    pub email: String,
    pub nama_lengkap: String,
    pub nip: String,
    pub alamat: String,
    pub nomor_whatsapp: String,
    pub opd_nama: String,
    pub jumlah_pohon: i64,
    pub jenis_pohon: String,
    pub sumber_bibit: String,
    pub lokasi_tanam: String,
    pub titik_lokasi: String,
    pub lokasi_list: Vec<LokasiTanam>,
}

/// Result of parsing a participation spreadsheet: structurally valid rows
/// plus per-row error strings for the rest.
#[derive(Debug, Default)]
pub struct PartisipasiSheet {
    pub rows: Vec<PartisipasiImportRow>,
    pub errors: Vec<String>,
}

/// Parse a participation spreadsheet in either the current export layout
/// (Nama/NIP/Alamat/No. WhatsApp/OPD/Jumlah/Jenis/Sumber Bibit/location
/// triples) or the legacy layout (Nama/NIP/Email/OPD/Alamat/WA/Jumlah/Jenis/
/// Lokasi). The layout is detected from the header row.
pub fn parse_partisipasi_sheet(bytes: &[u8]) -> Result<PartisipasiSheet, AppError> {
    let range = open_first_sheet(bytes)?;
    let width = range.width();
    let mut rows = range.rows();

    let headers = normalized_headers(rows.next().unwrap_or(&[]));
    let is_new_format = headers.iter().position(|h| h == "alamat").is_some_and(|i| i <= 3)
        || headers.iter().any(|h| h == "latitude")
        || headers.iter().any(|h| h == "sumber bibit");

    let mut sheet = PartisipasiSheet::default();

    for (offset, row) in rows.enumerate() {
        let row_number = offset + 2;

        let is_blank = row
            .iter()
            .all(|c| matches!(c, Data::Empty) || matches!(c, Data::String(s) if s.trim().is_empty()));
        if is_blank {
            continue;
        }
        if width < 5 {
            sheet.errors.push(format!("Row {}: incomplete data", row_number));
            continue;
        }

        let mut parsed = if is_new_format {
            PartisipasiImportRow {
                row_number,
                email: String::new(),
                nama_lengkap: cell_string(row, 0).trim().to_string(),
                nip: cell_string(row, 1).trim().to_string(),
                alamat: cell_string(row, 2).trim().to_string(),
                nomor_whatsapp: cell_string(row, 3).trim().to_string(),
                opd_nama: cell_string(row, 4).trim().to_string(),
                jumlah_pohon: cell_i64(row, 5),
                jenis_pohon: cell_string(row, 6).trim().to_string(),
                sumber_bibit: cell_string(row, 7).trim().to_string(),
                lokasi_tanam: cell_string(row, 8).trim().to_string(),
                titik_lokasi: join_titik(&cell_string(row, 9), &cell_string(row, 10)),
                lokasi_list: Vec::new(),
            }
        } else {
            PartisipasiImportRow {
                row_number,
                email: cell_string(row, 2).trim().to_string(),
                nama_lengkap: cell_string(row, 0).trim().to_string(),
                nip: cell_string(row, 1).trim().to_string(),
                alamat: cell_string(row, 4).trim().to_string(),
                nomor_whatsapp: cell_string(row, 5).trim().to_string(),
                opd_nama: cell_string(row, 3).trim().to_string(),
                jumlah_pohon: cell_i64(row, 6),
                jenis_pohon: cell_string(row, 7).trim().to_string(),
                sumber_bibit: String::new(),
                lokasi_tanam: cell_string(row, 8).trim().to_string(),
                titik_lokasi: String::new(),
                lokasi_list: Vec::new(),
            }
        };

        if parsed.nama_lengkap.is_empty() {
            sheet
                .errors
                .push(format!("Row {}: name must not be empty", row_number));
            continue;
        }

        if !parsed.lokasi_tanam.is_empty() {
            parsed.lokasi_list.push(LokasiTanam {
                lokasi_tanam: parsed.lokasi_tanam.clone(),
                titik_lokasi: Some(parsed.titik_lokasi.clone()),
                bukti_url: Some(String::new()),
            });
        }

        // Additional location triples follow the first longitude column.
        let mut idx = 11;
        while idx + 2 < width {
            let lokasi = cell_string(row, idx).trim().to_string();
            if !lokasi.is_empty() {
                let titik = join_titik(&cell_string(row, idx + 1), &cell_string(row, idx + 2));
                parsed.lokasi_list.push(LokasiTanam {
                    lokasi_tanam: lokasi,
                    titik_lokasi: Some(titik),
                    bukti_url: Some(String::new()),
                });
            }
            idx += 3;
        }

        sheet.rows.push(parsed);
    }

    Ok(sheet)
}

fn open_first_sheet(bytes: &[u8]) -> Result<Range<Data>, AppError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::Internal(format!("Failed to read workbook: {}", e)))?;

    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Validation("The workbook has no sheets".to_string()))?
        .map_err(|e| AppError::Internal(format!("Failed to read sheet: {}", e)))
}

fn normalized_headers(row: &[Data]) -> Vec<String> {
    row.iter()
        .map(|c| cell_to_string(c).to_lowercase().trim().to_string())
        .collect()
}

fn join_titik(latitude: &str, longitude: &str) -> String {
    let latitude = latitude.trim();
    let longitude = longitude.trim();
    if latitude.is_empty() || longitude.is_empty() {
        return String::new();
    }
    format!("{}, {}", latitude, longitude)
}

fn cell_string(row: &[Data], idx: usize) -> String {
    row.get(idx).map(cell_to_string).unwrap_or_default()
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        _ => String::new(),
    }
}

fn cell_i64(row: &[Data], idx: usize) -> i64 {
    match row.get(idx) {
        Some(Data::Int(i)) => *i,
        Some(Data::Float(f)) => *f as i64,
        Some(Data::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
