//! WhatsApp contact endpoints.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::{normalize_nomor_whatsapp, KontakWhatsapp, SaveKontakRequest};
use crate::AppState;

/// GET /api/kontak-whatsapp - Get the public WhatsApp contact; null fields
/// when none has been configured yet.
pub async fn get_kontak(State(state): State<AppState>) -> Result<Json<KontakWhatsapp>, AppError> {
    let kontak = state
        .repo
        .get_kontak()
        .await?
        .unwrap_or_else(KontakWhatsapp::unset);
    Ok(Json(kontak))
}

/// POST /api/kontak-whatsapp - Save the WhatsApp contact, replacing any
/// previous one. The number is normalized to international `62...` form.
pub async fn save_kontak(
    State(state): State<AppState>,
    Json(request): Json<SaveKontakRequest>,
) -> Result<Json<KontakWhatsapp>, AppError> {
    let nomor = normalize_nomor_whatsapp(&request.nomor_whatsapp).map_err(AppError::Validation)?;
    let pesan = request.pesan_default.unwrap_or_default();

    Ok(Json(state.repo.save_kontak(&nomor, &pesan).await?))
}
