//! Educational post model.

use serde::{Deserialize, Serialize};

/// An educational article shown on the public site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edukasi {
    pub id: String,
    pub judul: String,
    pub konten: String,
    pub gambar_url: Option<String>,
    pub created_at: String,
}

/// Request body for creating an educational post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEdukasiRequest {
    pub judul: String,
    pub konten: String,
    #[serde(default)]
    pub gambar_url: Option<String>,
}

/// Request body for a partial educational-post update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEdukasiRequest {
    #[serde(default)]
    pub judul: Option<String>,
    #[serde(default)]
    pub konten: Option<String>,
    #[serde(default)]
    pub gambar_url: Option<String>,
}

impl UpdateEdukasiRequest {
    pub fn is_empty(&self) -> bool {
        self.judul.is_none() && self.konten.is_none() && self.gambar_url.is_none()
    }
}
