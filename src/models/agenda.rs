//! Agenda (planting event) model.

use serde::{Deserialize, Serialize};

/// A scheduled planting event. `status` is `upcoming`, `ongoing`, or
/// `completed` by convention; no transition graph is enforced server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agenda {
    pub id: String,
    pub nama_kegiatan: String,
    pub hari: String,
    pub tanggal: String,
    pub lokasi_kecamatan: String,
    pub lokasi_desa: String,
    pub deskripsi: Option<String>,
    pub status: String,
    pub created_at: String,
}

/// Request body for creating an agenda item; status always starts `upcoming`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgendaRequest {
    pub nama_kegiatan: String,
    pub hari: String,
    pub tanggal: String,
    pub lokasi_kecamatan: String,
    pub lokasi_desa: String,
    #[serde(default)]
    pub deskripsi: Option<String>,
}

/// Request body for a partial agenda update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAgendaRequest {
    #[serde(default)]
    pub nama_kegiatan: Option<String>,
    #[serde(default)]
    pub hari: Option<String>,
    #[serde(default)]
    pub tanggal: Option<String>,
    #[serde(default)]
    pub lokasi_kecamatan: Option<String>,
    #[serde(default)]
    pub lokasi_desa: Option<String>,
    #[serde(default)]
    pub deskripsi: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateAgendaRequest {
    pub fn is_empty(&self) -> bool {
        self.nama_kegiatan.is_none()
            && self.hari.is_none()
            && self.tanggal.is_none()
            && self.lokasi_kecamatan.is_none()
            && self.lokasi_desa.is_none()
            && self.deskripsi.is_none()
            && self.status.is_none()
    }
}
