//! Configuration module for the Agro Mopomulo backend.
//!
//! All configuration is loaded from environment variables with sensible
//! defaults, except for the JWT signing secret which is required.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default access-token lifetime in hours.
const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 24;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// HMAC-SHA256 secret used to sign and verify access tokens (required)
    pub jwt_secret: String,
    /// Access-token lifetime in hours
    pub token_expiry_hours: i64,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    ///
    /// Panics if `MOPOMULO_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("MOPOMULO_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let bind_addr = env::var("MOPOMULO_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid MOPOMULO_BIND_ADDR format");

        let log_level = env::var("MOPOMULO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let jwt_secret = env::var("MOPOMULO_JWT_SECRET")
            .expect("MOPOMULO_JWT_SECRET must be set in the environment");
        assert!(!jwt_secret.is_empty(), "MOPOMULO_JWT_SECRET must not be empty");

        let token_expiry_hours: i64 = env::var("MOPOMULO_TOKEN_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY_HOURS.to_string())
            .parse()
            .expect("MOPOMULO_TOKEN_EXPIRY_HOURS must be a valid i64");

        let cors_origins = parse_cors_origins(
            &env::var("MOPOMULO_CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        Self {
            db_path,
            bind_addr,
            log_level,
            jwt_secret,
            token_expiry_hours,
            cors_origins,
        }
    }
}

/// Parse a comma-separated origin list; `*` means any origin (empty list).
fn parse_cors_origins(raw: &str) -> Vec<String> {
    if raw.trim() == "*" {
        return Vec::new();
    }
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
