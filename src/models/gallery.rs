//! Gallery item model.

use serde::{Deserialize, Serialize};

/// A photo in the public gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub description: Option<String>,
    pub created_at: String,
}

/// Request body for adding a gallery item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGalleryRequest {
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub description: Option<String>,
}
