//! XLSX and PDF renderers for the participation report.
//!
//! Both renderers are pure functions over already-fetched rows; handlers
//! stream the returned bytes as file downloads.

use std::collections::HashMap;

use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_xlsxwriter::Workbook;

use crate::errors::AppError;
use crate::models::Partisipasi;

pub const EXCEL_FILENAME: &str = "data_partisipasi_agro_mopomulo.xlsx";
pub const PDF_FILENAME: &str = "laporan_agro_mopomulo.pdf";

/// The PDF table keeps a fixed width: at most this many records and location
/// columns.
const PDF_MAX_ROWS: usize = 100;
const PDF_MAX_LOKASI: usize = 3;

// ==================== XLSX ====================

/// Render all participation records to an XLSX workbook whose layout matches
/// the import format: fixed columns followed by one
/// Lokasi Tanam/Latitude/Longitude triple per location.
pub fn render_excel(
    rows: &[Partisipasi],
    opd_names: &HashMap<String, String>,
) -> Result<Vec<u8>, AppError> {
    let max_lokasi = rows
        .iter()
        .map(|p| p.lokasi_list.len())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Data Partisipasi")?;

    let mut headers: Vec<String> = [
        "Nama",
        "NIP",
        "Alamat",
        "No. WhatsApp",
        "OPD",
        "Jumlah Pohon",
        "Jenis Pohon",
        "Sumber Bibit",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();

    for i in 1..=max_lokasi {
        if max_lokasi == 1 {
            headers.push("Lokasi Tanam".to_string());
            headers.push("Latitude".to_string());
            headers.push("Longitude".to_string());
        } else {
            headers.push(format!("Lokasi Tanam {}", i));
            headers.push(format!("Latitude {}", i));
            headers.push(format!("Longitude {}", i));
        }
    }

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }

    for (idx, p) in rows.iter().enumerate() {
        let row = (idx + 1) as u32;
        let opd_nama = opd_names
            .get(&p.opd_id)
            .map(String::as_str)
            .unwrap_or("Unknown");

        worksheet.write_string(row, 0, &p.nama_lengkap)?;
        worksheet.write_string(row, 1, p.nip.as_deref().unwrap_or(""))?;
        worksheet.write_string(row, 2, p.alamat.as_deref().unwrap_or(""))?;
        worksheet.write_string(row, 3, p.nomor_whatsapp.as_deref().unwrap_or(""))?;
        worksheet.write_string(row, 4, opd_nama)?;
        worksheet.write_number(row, 5, p.jumlah_pohon as f64)?;
        worksheet.write_string(row, 6, &p.jenis_pohon)?;
        worksheet.write_string(row, 7, p.sumber_bibit.as_deref().unwrap_or(""))?;

        let lokasi_list = p.effective_lokasi();
        for i in 0..max_lokasi {
            let col = (8 + i * 3) as u16;
            match lokasi_list.get(i) {
                Some(loc) => {
                    let (latitude, longitude) = split_titik(loc.titik_lokasi.as_deref());
                    worksheet.write_string(row, col, &loc.lokasi_tanam)?;
                    worksheet.write_string(row, col + 1, &latitude)?;
                    worksheet.write_string(row, col + 2, &longitude)?;
                }
                None => {
                    worksheet.write_string(row, col, "")?;
                    worksheet.write_string(row, col + 1, "")?;
                    worksheet.write_string(row, col + 2, "")?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Split a `"lat, lng"` coordinate string into its parts; anything without a
/// comma yields two empty strings.
fn split_titik(titik: Option<&str>) -> (String, String) {
    match titik {
        Some(t) if t.contains(',') => {
            let (lat, lng) = t.split_once(',').unwrap_or(("", ""));
            (lat.trim().to_string(), lng.trim().to_string())
        }
        _ => (String::new(), String::new()),
    }
}

// ==================== PDF ====================

/// Render the participation report as a landscape A4 PDF table. Cell text is
/// hard-truncated to fixed per-column character widths and the table caps at
/// the first 100 records and 3 location columns.
pub fn render_pdf(
    rows: &[Partisipasi],
    opd_names: &HashMap<String, String>,
    tanggal_cetak: &str,
) -> Result<Vec<u8>, AppError> {
    let rows = &rows[..rows.len().min(PDF_MAX_ROWS)];
    let max_lokasi = rows
        .iter()
        .map(|p| p.lokasi_list.len())
        .max()
        .unwrap_or(0)
        .clamp(1, PDF_MAX_LOKASI);

    let page_width = 297.0;
    let page_height = 210.0;

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Laporan Data Partisipasi Program Agro Mopomulo",
        Mm(page_width),
        Mm(page_height),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    // (header, column width in mm, truncation width in characters)
    let mut columns: Vec<(String, f32, usize)> = vec![
        ("No".to_string(), 12.0, 4),
        ("Nama".to_string(), 48.0, 20),
        ("NIP".to_string(), 36.0, 15),
        ("OPD".to_string(), 48.0, 15),
        ("Pohon".to_string(), 18.0, 6),
        ("Jenis".to_string(), 30.0, 12),
    ];
    for i in 1..=max_lokasi {
        let header = if max_lokasi == 1 {
            "Lokasi".to_string()
        } else {
            format!("Lokasi {}", i)
        };
        columns.push((header, 30.0, 15));
    }

    let margin_left = 10.0;
    let margin_bottom = 15.0;
    let row_step = 5.5;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);

    // Title block on the first page only
    layer.use_text(
        "Laporan Data Partisipasi Program Agro Mopomulo",
        14.0,
        Mm(margin_left),
        Mm(page_height - 15.0),
        &font_bold,
    );
    layer.use_text(
        format!("Kabupaten Gorontalo Utara - {}", tanggal_cetak),
        10.0,
        Mm(margin_left),
        Mm(page_height - 22.0),
        &font,
    );

    let header_cells: Vec<String> = columns.iter().map(|(header, _, _)| header.clone()).collect();

    let mut y = page_height - 32.0;
    draw_row(&layer, &font_bold, &columns, margin_left, y, &header_cells);
    y -= row_step;

    for (idx, p) in rows.iter().enumerate() {
        if y < margin_bottom {
            let (page, page_layer) = doc.add_page(Mm(page_width), Mm(page_height), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = page_height - 15.0;
            draw_row(&layer, &font_bold, &columns, margin_left, y, &header_cells);
            y -= row_step;
        }

        let opd_nama = opd_names
            .get(&p.opd_id)
            .map(String::as_str)
            .unwrap_or("");
        let lokasi_list = p.effective_lokasi();

        let mut cells = vec![
            (idx + 1).to_string(),
            p.nama_lengkap.clone(),
            p.nip.clone().unwrap_or_default(),
            opd_nama.to_string(),
            p.jumlah_pohon.to_string(),
            p.jenis_pohon.clone(),
        ];
        for i in 0..max_lokasi {
            cells.push(
                lokasi_list
                    .get(i)
                    .map(|loc| loc.lokasi_tanam.clone())
                    .unwrap_or_default(),
            );
        }

        draw_row(&layer, &font, &columns, margin_left, y, &cells);
        y -= row_step;
    }

    Ok(doc.save_to_bytes()?)
}

fn draw_row(
    layer: &printpdf::PdfLayerReference,
    font: &printpdf::IndirectFontRef,
    columns: &[(String, f32, usize)],
    margin_left: f32,
    y: f32,
    cells: &[String],
) {
    let mut x = margin_left;
    for (cell, (_, width, trunc)) in cells.iter().zip(columns) {
        layer.use_text(truncate(cell, *trunc), 7.0, Mm(x), Mm(y), font);
        x += width;
    }
}

/// Hard-truncate a string to at most `max_chars` characters.
fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LokasiTanam;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    fn record(nama: &str, opd_id: &str, pohon: i64, lokasi: Vec<LokasiTanam>) -> Partisipasi {
        Partisipasi {
            id: uuid::Uuid::new_v4().to_string(),
            email: None,
            nama_lengkap: nama.to_string(),
            nip: Some("19870101".to_string()),
            opd_id: opd_id.to_string(),
            opd_nama: None,
            alamat: Some("Jl. Trans Sulawesi".to_string()),
            nomor_whatsapp: Some("6281234567890".to_string()),
            jumlah_pohon: pohon,
            jenis_pohon: "Mahoni".to_string(),
            sumber_bibit: Some("Mandiri".to_string()),
            lokasi_tanam: lokasi.first().map(|l| l.lokasi_tanam.clone()),
            titik_lokasi: None,
            bukti_url: None,
            lokasi_list: lokasi,
            status: Some("pending".to_string()),
            created_at: "2025-01-02T00:00:00+00:00".to_string(),
        }
    }

    fn loc(nama: &str, titik: Option<&str>) -> LokasiTanam {
        LokasiTanam {
            lokasi_tanam: nama.to_string(),
            titik_lokasi: titik.map(|t| t.to_string()),
            bukti_url: None,
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 4), "abcd");
        assert_eq!(truncate("ab", 4), "ab");
        assert_eq!(truncate("", 4), "");
    }

    #[test]
    fn test_split_titik() {
        assert_eq!(
            split_titik(Some("0.91, 122.78")),
            ("0.91".to_string(), "122.78".to_string())
        );
        assert_eq!(split_titik(Some("no-comma")), (String::new(), String::new()));
        assert_eq!(split_titik(None), (String::new(), String::new()));
    }

    #[test]
    fn test_render_excel_layout() {
        let mut opd_names = HashMap::new();
        opd_names.insert("opd-1".to_string(), "Dinas Pertanian".to_string());

        let rows = vec![
            record(
                "Budi",
                "opd-1",
                20,
                vec![
                    loc("Kebun desa", Some("0.91, 122.78")),
                    loc("Pekarangan", None),
                ],
            ),
            record("Siti", "opd-1", 10, vec![loc("Halaman kantor", None)]),
        ];

        let bytes = render_excel(&rows, &opd_names).expect("render should succeed");

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).expect("valid workbook");
        let range = workbook
            .worksheet_range_at(0)
            .expect("sheet exists")
            .expect("sheet readable");

        // Two location columns -> numbered headers
        assert_eq!(
            range.get_value((0, 8)),
            Some(&Data::String("Lokasi Tanam 1".to_string()))
        );
        assert_eq!(
            range.get_value((0, 11)),
            Some(&Data::String("Lokasi Tanam 2".to_string()))
        );

        assert_eq!(
            range.get_value((1, 0)),
            Some(&Data::String("Budi".to_string()))
        );
        assert_eq!(
            range.get_value((1, 4)),
            Some(&Data::String("Dinas Pertanian".to_string()))
        );
        assert_eq!(range.get_value((1, 5)), Some(&Data::Float(20.0)));
        // Coordinates split into separate columns
        assert_eq!(
            range.get_value((1, 9)),
            Some(&Data::String("0.91".to_string()))
        );
        assert_eq!(
            range.get_value((1, 10)),
            Some(&Data::String("122.78".to_string()))
        );
    }

    #[test]
    fn test_render_excel_unnumbered_single_location() {
        let opd_names = HashMap::new();
        let rows = vec![record("Budi", "opd-x", 5, vec![loc("Kebun desa", None)])];

        let bytes = render_excel(&rows, &opd_names).expect("render should succeed");
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).expect("valid workbook");
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();

        assert_eq!(
            range.get_value((0, 8)),
            Some(&Data::String("Lokasi Tanam".to_string()))
        );
        // Unknown OPD falls back to the placeholder
        assert_eq!(
            range.get_value((1, 4)),
            Some(&Data::String("Unknown".to_string()))
        );
    }

    #[test]
    fn test_render_pdf_produces_document() {
        let mut opd_names = HashMap::new();
        opd_names.insert("opd-1".to_string(), "Dinas Pertanian".to_string());

        // More rows than fit on one page to exercise pagination
        let rows: Vec<Partisipasi> = (0..60)
            .map(|i| {
                record(
                    &format!("Peserta {}", i),
                    "opd-1",
                    10,
                    vec![loc("Kebun desa", None)],
                )
            })
            .collect();

        let bytes = render_pdf(&rows, &opd_names, "1 Januari 2025").expect("render should succeed");
        assert!(bytes.starts_with(b"%PDF"), "output must be a PDF document");
        assert!(bytes.len() > 1000);
    }
}
