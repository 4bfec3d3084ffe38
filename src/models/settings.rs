//! Site settings singleton.

use serde::{Deserialize, Serialize};

/// Site-wide content settings. At most one row ever exists; it is created
/// lazily with program defaults on first read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub id: String,
    pub logo_url: Option<String>,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_image_url: Option<String>,
    pub tentang_title: Option<String>,
    pub tentang_content: Option<String>,
    pub tentang_visi: Option<String>,
    pub tentang_misi: Option<String>,
    /// News popup rotation interval in seconds.
    pub berita_popup_interval: i64,
}

impl Settings {
    /// Program defaults used when the singleton is first created.
    pub fn with_defaults(id: String) -> Self {
        Self {
            id,
            logo_url: None,
            hero_title: "Gerakan Agro Mopomulo".to_string(),
            hero_subtitle: "Satu Orang Sepuluh Pohon untuk Masa Depan Daerah".to_string(),
            hero_image_url: Some(
                "https://images.unsplash.com/photo-1765333534690-ad3a985e7c42?crop=entropy&cs=srgb&fm=jpg&q=85"
                    .to_string(),
            ),
            tentang_title: Some("Program Agro Mopomulo".to_string()),
            tentang_content: Some(
                "Mopomulo berasal dari bahasa Gorontalo yang berarti \"menanam\". Program Agro \
                 Mopomulo adalah inisiatif Pemerintah Kabupaten Gorontalo Utara untuk \
                 meningkatkan kesadaran dan partisipasi masyarakat dalam pelestarian \
                 lingkungan.\n\nDengan konsep \"Satu Orang Sepuluh Pohon\", program ini \
                 menargetkan setiap ASN dan warga untuk berkontribusi menanam minimal 10 pohon, \
                 baik pohon produktif maupun pohon pelindung."
                    .to_string(),
            ),
            tentang_visi: Some(
                "Mewujudkan Kabupaten Gorontalo Utara sebagai daerah yang hijau, asri, dan \
                 berkelanjutan dengan partisipasi aktif seluruh lapisan masyarakat dalam \
                 pelestarian lingkungan."
                    .to_string(),
            ),
            tentang_misi: Some(
                "- Meningkatkan kesadaran lingkungan masyarakat\n- Memperluas area hijau di \
                 seluruh wilayah\n- Mendukung ketahanan pangan daerah\n- Membangun budaya peduli \
                 lingkungan"
                    .to_string(),
            ),
            berita_popup_interval: 5,
        }
    }
}

/// Request body for a partial settings update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub hero_title: Option<String>,
    #[serde(default)]
    pub hero_subtitle: Option<String>,
    #[serde(default)]
    pub hero_image_url: Option<String>,
    #[serde(default)]
    pub tentang_title: Option<String>,
    #[serde(default)]
    pub tentang_content: Option<String>,
    #[serde(default)]
    pub tentang_visi: Option<String>,
    #[serde(default)]
    pub tentang_misi: Option<String>,
    #[serde(default)]
    pub berita_popup_interval: Option<i64>,
}

/// Response body for the public image upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub url: String,
}

/// Response body for the logo upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadLogoResponse {
    pub logo_url: String,
}
