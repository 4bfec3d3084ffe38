//! REST API module.
//!
//! Contains all route handlers behind the `/api` prefix. Read endpoints are
//! public; mutating endpoints sit behind the bearer-token layer.

mod agenda;
mod auth;
mod berita;
mod deteksi_ganda;
mod edukasi;
mod export;
mod gallery;
mod kontak;
mod opd;
mod partisipasi;
mod settings;
mod stats;

pub use agenda::*;
pub use auth::*;
pub use berita::*;
pub use deteksi_ganda::*;
pub use edukasi::*;
pub use export::*;
pub use gallery::*;
pub use kontak::*;
pub use opd::*;
pub use partisipasi::*;
pub use settings::*;
pub use stats::*;

use serde::{Deserialize, Serialize};

/// Body for simple acknowledgement responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
