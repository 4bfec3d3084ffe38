//! Admin user model.

use serde::{Deserialize, Serialize};

/// A registered admin user. The password hash stays inside the backend; the
/// API only ever serializes [`UserResponse`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub nama: String,
    pub role: String,
    pub created_at: String,
}

/// Public projection of a user, without credential material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub nama: String,
    pub role: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            nama: user.nama.clone(),
            role: user.role.clone(),
        }
    }
}

/// Request body for registering a new admin.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub nama: String,
}

/// Request body for logging in.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for register/login: a signed token plus its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Lightweight email shape check: `local@domain.tld`, single `@`, no
/// whitespace.
pub fn is_valid_email(s: &str) -> bool {
    if s.contains(char::is_whitespace) || s.matches('@').count() != 1 {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty() && !tld.is_empty() && tld.chars().all(|c| c.is_alphanumeric())
        }
        None => false,
    }
}
