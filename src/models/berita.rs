//! News (berita) model.

use serde::{Deserialize, Serialize};

/// A news entry linking to an external article. Active entries feed the
/// public popup rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Berita {
    pub id: String,
    pub judul: String,
    pub deskripsi_singkat: String,
    pub link_berita: Option<String>,
    /// Inline body; superseded by `link_berita` but kept for old entries.
    pub isi_berita: Option<String>,
    pub gambar_url: Option<String>,
    /// `"link"` or `"file"`.
    pub gambar_type: String,
    pub is_active: bool,
    pub created_at: String,
}

/// Request body for creating a news entry; entries start active.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBeritaRequest {
    pub judul: String,
    pub deskripsi_singkat: String,
    pub link_berita: String,
    #[serde(default)]
    pub isi_berita: Option<String>,
    #[serde(default)]
    pub gambar_url: Option<String>,
    #[serde(default)]
    pub gambar_type: Option<String>,
}

/// Request body for a partial news update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBeritaRequest {
    #[serde(default)]
    pub judul: Option<String>,
    #[serde(default)]
    pub deskripsi_singkat: Option<String>,
    #[serde(default)]
    pub link_berita: Option<String>,
    #[serde(default)]
    pub isi_berita: Option<String>,
    #[serde(default)]
    pub gambar_url: Option<String>,
    #[serde(default)]
    pub gambar_type: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateBeritaRequest {
    pub fn is_empty(&self) -> bool {
        self.judul.is_none()
            && self.deskripsi_singkat.is_none()
            && self.link_berita.is_none()
            && self.isi_berita.is_none()
            && self.gambar_url.is_none()
            && self.gambar_type.is_none()
            && self.is_active.is_none()
    }
}
