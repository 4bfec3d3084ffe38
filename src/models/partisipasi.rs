//! Participation record: one tree-planting submission.

use serde::{Deserialize, Serialize};

/// A single planting location within a participation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LokasiTanam {
    pub lokasi_tanam: String,
    #[serde(default)]
    pub titik_lokasi: Option<String>,
    #[serde(default)]
    pub bukti_url: Option<String>,
}

/// One person's tree-planting submission, possibly spanning several planting
/// locations.
///
/// Invariant: the legacy single-location triple (`lokasi_tanam`,
/// `titik_lokasi`, `bukti_url`) is always the projection of
/// `lokasi_list[0]` and is recomputed on every write that changes the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partisipasi {
    pub id: String,
    pub email: Option<String>,
    pub nama_lengkap: String,
    pub nip: Option<String>,
    pub opd_id: String,
    /// Resolved OPD name; filled in by the API layer, never persisted.
    pub opd_nama: Option<String>,
    pub alamat: Option<String>,
    pub nomor_whatsapp: Option<String>,
    pub jumlah_pohon: i64,
    pub jenis_pohon: String,
    pub sumber_bibit: Option<String>,
    pub lokasi_tanam: Option<String>,
    pub titik_lokasi: Option<String>,
    pub bukti_url: Option<String>,
    #[serde(default)]
    pub lokasi_list: Vec<LokasiTanam>,
    pub status: Option<String>,
    pub created_at: String,
}

impl Partisipasi {
    /// The record's locations with the legacy fallback applied: an empty
    /// `lokasi_list` plus a non-empty legacy location yields a one-element
    /// list.
    pub fn effective_lokasi(&self) -> Vec<LokasiTanam> {
        if !self.lokasi_list.is_empty() {
            return self.lokasi_list.clone();
        }
        match self.lokasi_tanam.as_deref() {
            Some(nama) if !nama.is_empty() => vec![LokasiTanam {
                lokasi_tanam: nama.to_string(),
                titik_lokasi: self.titik_lokasi.clone(),
                bukti_url: self.bukti_url.clone(),
            }],
            _ => Vec::new(),
        }
    }
}

/// The legacy single-location projection of a location list: its first
/// element, or all-`None` when the list is empty.
pub fn mirror_first(
    lokasi_list: &[LokasiTanam],
) -> (Option<String>, Option<String>, Option<String>) {
    match lokasi_list.first() {
        Some(first) => (
            Some(first.lokasi_tanam.clone()),
            first.titik_lokasi.clone(),
            first.bukti_url.clone(),
        ),
        None => (None, None, None),
    }
}

/// Request body for submitting a participation record. Either the legacy
/// single-location triple or `lokasi_list` may be supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePartisipasiRequest {
    #[serde(default)]
    pub email: Option<String>,
    pub nama_lengkap: String,
    #[serde(default)]
    pub nip: Option<String>,
    pub opd_id: String,
    #[serde(default)]
    pub alamat: Option<String>,
    #[serde(default)]
    pub nomor_whatsapp: Option<String>,
    pub jumlah_pohon: i64,
    pub jenis_pohon: String,
    pub sumber_bibit: String,
    #[serde(default)]
    pub lokasi_tanam: Option<String>,
    #[serde(default)]
    pub titik_lokasi: Option<String>,
    #[serde(default)]
    pub bukti_url: Option<String>,
    #[serde(default)]
    pub lokasi_list: Option<Vec<LokasiTanam>>,
}

impl CreatePartisipasiRequest {
    /// Normalize the submitted locations into a canonical list: a non-empty
    /// `lokasi_list` wins; otherwise a non-empty legacy location is wrapped
    /// into a one-element list.
    pub fn resolve_lokasi(&self) -> Vec<LokasiTanam> {
        if let Some(list) = &self.lokasi_list {
            if !list.is_empty() {
                return list.clone();
            }
        }
        match self.lokasi_tanam.as_deref() {
            Some(nama) if !nama.is_empty() => vec![LokasiTanam {
                lokasi_tanam: nama.to_string(),
                titik_lokasi: self.titik_lokasi.clone(),
                bukti_url: self.bukti_url.clone(),
            }],
            _ => Vec::new(),
        }
    }
}

/// Request body for a partial participation update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePartisipasiRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nama_lengkap: Option<String>,
    #[serde(default)]
    pub nip: Option<String>,
    #[serde(default)]
    pub opd_id: Option<String>,
    #[serde(default)]
    pub alamat: Option<String>,
    #[serde(default)]
    pub nomor_whatsapp: Option<String>,
    #[serde(default)]
    pub jumlah_pohon: Option<i64>,
    #[serde(default)]
    pub jenis_pohon: Option<String>,
    #[serde(default)]
    pub sumber_bibit: Option<String>,
    #[serde(default)]
    pub lokasi_tanam: Option<String>,
    #[serde(default)]
    pub titik_lokasi: Option<String>,
    #[serde(default)]
    pub bukti_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub lokasi_list: Option<Vec<LokasiTanam>>,
}

impl UpdatePartisipasiRequest {
    /// True when no field was supplied; such an update is rejected upstream.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.nama_lengkap.is_none()
            && self.nip.is_none()
            && self.opd_id.is_none()
            && self.alamat.is_none()
            && self.nomor_whatsapp.is_none()
            && self.jumlah_pohon.is_none()
            && self.jenis_pohon.is_none()
            && self.sumber_bibit.is_none()
            && self.lokasi_tanam.is_none()
            && self.titik_lokasi.is_none()
            && self.bukti_url.is_none()
            && self.status.is_none()
            && self.lokasi_list.is_none()
    }
}

/// Request body for merging duplicate participation records.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeDuplicatesRequest {
    pub primary_id: String,
    pub secondary_ids: Vec<String>,
}
