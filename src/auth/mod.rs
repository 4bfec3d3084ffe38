//! Bearer-token authentication module.
//!
//! Access tokens are HS256-signed JWTs carrying a [`Claims`] payload; password
//! hashes use Argon2id in PHC string format so algorithm parameters and salt
//! travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::{codes, ErrorBody};

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user's record id.
    pub user_id: String,
    /// The user's email at issue time.
    pub email: String,
    /// The user's role name (e.g. `"admin"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

// ==================== TOKENS ====================

/// Generate an HS256 access token for the given user.
pub fn create_token(
    user_id: &str,
    email: &str,
    role: &str,
    secret: &str,
    expiry_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = chrono::Utc::now().timestamp() + expiry_hours * 3600;
    let claims = Claims {
        user_id: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp,
    };
    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Bearer-token auth layer; validated claims are stored in request extensions
/// for handlers that need the caller's identity.
pub async fn bearer_auth_layer(secret: String, mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    let Some(token) = token else {
        return unauthorized_response("Missing bearer token");
    };

    match decode_token(&token, &secret) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
            unauthorized_response("Token has expired")
        }
        Err(_) => unauthorized_response("Invalid token"),
    }
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        code: codes::UNAUTHORIZED.to_string(),
        message: message.to_string(),
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

// ==================== PASSWORDS ====================

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    #[test]
    fn test_create_and_decode_token() {
        let token = create_token("user-1", "admin@example.com", "admin", SECRET, 24)
            .expect("token generation should succeed");

        let claims = decode_token(&token, SECRET).expect("token validation should succeed");
        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_expired_token_fails() {
        // Expired well beyond the default 60-second validation leeway.
        let exp = chrono::Utc::now().timestamp() - 300;
        let claims = Claims {
            user_id: "user-1".to_string(),
            email: "admin@example.com".to_string(),
            role: "admin".to_string(),
            exp,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("encoding should succeed");

        let result = decode_token(&token, SECRET);
        assert!(result.is_err(), "expired token must fail validation");
    }

    #[test]
    fn test_different_secrets_fail() {
        let token = create_token("user-1", "admin@example.com", "admin", SECRET, 24).unwrap();
        assert!(decode_token(&token, "another-secret").is_err());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("rahasia-123").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"), "expected argon2id PHC prefix");

        assert!(verify_password("rahasia-123", &hash).unwrap());
        assert!(!verify_password("salah", &hash).unwrap());
    }
}
