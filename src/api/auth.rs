//! Auth endpoints: registration, login, and current-user lookup.

use axum::{extract::State, Extension, Json};

use crate::auth::{create_token, hash_password, verify_password, Claims};
use crate::errors::AppError;
use crate::models::{is_valid_email, AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::AppState;

/// POST /api/auth/register - Register a new admin and issue a token.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if !is_valid_email(&request.email) {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }
    if request.nama.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    if state.repo.find_user_by_email(&request.email).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let user = state
        .repo
        .create_user(&request.email, &password_hash, &request.nama, "admin")
        .await?;

    tracing::info!("Registered admin {}", user.email);

    let token = create_token(
        &user.id,
        &user.email,
        &user.role,
        &state.config.jwt_secret,
        state.config.token_expiry_hours,
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// POST /api/auth/login - Authenticate and issue a fresh token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state.repo.find_user_by_email(&request.email).await?;

    let Some(user) = user else {
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    };

    let matches = verify_password(&request.password, &user.password)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))?;
    if !matches {
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    }

    let token = create_token(
        &user.id,
        &user.email,
        &user.role,
        &state.config.jwt_secret,
        state.config.token_expiry_hours,
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// GET /api/auth/me - Resolve the caller's user record from their token.
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .repo
        .find_user_by_id(&claims.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(&user)))
}
