//! Organizational unit (OPD) reference data.

use serde::{Deserialize, Serialize};

/// An organizational unit: a government office, a village, or the general
/// public bucket. `kategori` is `OPD`, `DESA`, or `PUBLIK` by convention.
/// `jumlah_personil` drives the planting target (ten trees per person).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opd {
    pub id: String,
    pub nama: String,
    pub kode: Option<String>,
    pub alamat: Option<String>,
    pub jumlah_personil: i64,
    pub kategori: String,
    pub created_at: String,
}

/// Request body for creating an OPD.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOpdRequest {
    pub nama: String,
    #[serde(default)]
    pub kode: Option<String>,
    #[serde(default)]
    pub alamat: Option<String>,
    #[serde(default)]
    pub jumlah_personil: Option<i64>,
    #[serde(default)]
    pub kategori: Option<String>,
}

/// Request body for a partial OPD update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOpdRequest {
    #[serde(default)]
    pub nama: Option<String>,
    #[serde(default)]
    pub kode: Option<String>,
    #[serde(default)]
    pub alamat: Option<String>,
    #[serde(default)]
    pub jumlah_personil: Option<i64>,
    #[serde(default)]
    pub kategori: Option<String>,
}

impl UpdateOpdRequest {
    /// True when no field was supplied; such an update is rejected upstream.
    pub fn is_empty(&self) -> bool {
        self.nama.is_none()
            && self.kode.is_none()
            && self.alamat.is_none()
            && self.jumlah_personil.is_none()
            && self.kategori.is_none()
    }
}

/// Report returned by the OPD bulk import.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportOpdResponse {
    pub message: String,
    pub imported: i64,
    pub skipped: i64,
}
