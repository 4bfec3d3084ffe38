//! WhatsApp contact singleton.

use serde::{Deserialize, Serialize};

/// The single public WhatsApp contact. Saving replaces whatever was stored
/// before; only one number is ever active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KontakWhatsapp {
    pub nomor_whatsapp: Option<String>,
    pub pesan_default: Option<String>,
    pub updated_at: Option<String>,
}

impl KontakWhatsapp {
    /// The response served before any contact has been configured.
    pub fn unset() -> Self {
        Self {
            nomor_whatsapp: None,
            pesan_default: None,
            updated_at: None,
        }
    }
}

/// Request body for saving the WhatsApp contact.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveKontakRequest {
    pub nomor_whatsapp: String,
    #[serde(default)]
    pub pesan_default: Option<String>,
}

/// Normalize an Indonesian WhatsApp number to international `62...` form.
///
/// Keeps digits and `+`, strips the leading `+`, rewrites a leading `08` to
/// `628`, and prefixes `62` when missing. Numbers shorter than 10 digits
/// after normalization are rejected.
pub fn normalize_nomor_whatsapp(raw: &str) -> Result<String, String> {
    if raw.is_empty() {
        return Err("WhatsApp number is required".to_string());
    }

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    let cleaned = cleaned.trim_start_matches('+').to_string();

    let normalized = if let Some(rest) = cleaned.strip_prefix("08") {
        format!("628{}", rest)
    } else if cleaned.starts_with("62") {
        cleaned
    } else {
        format!("62{}", cleaned)
    };

    if normalized.len() < 10 {
        return Err("WhatsApp number is not valid".to_string());
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_local_prefix() {
        assert_eq!(
            normalize_nomor_whatsapp("081234567890").unwrap(),
            "6281234567890"
        );
    }

    #[test]
    fn test_normalize_plus_and_spacing() {
        assert_eq!(
            normalize_nomor_whatsapp("+62 812-3456-7890").unwrap(),
            "6281234567890"
        );
    }

    #[test]
    fn test_normalize_bare_number_gets_country_code() {
        assert_eq!(
            normalize_nomor_whatsapp("81234567890").unwrap(),
            "6281234567890"
        );
    }

    #[test]
    fn test_normalize_rejects_short_numbers() {
        assert!(normalize_nomor_whatsapp("0812").is_err());
        assert!(normalize_nomor_whatsapp("").is_err());
    }
}
