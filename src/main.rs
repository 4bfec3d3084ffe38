//! Agro Mopomulo Backend
//!
//! REST backend for the tree-planting program dashboard: OPD reference data,
//! public participation submissions, program content, request-time
//! aggregation, duplicate cleanup, and XLSX/PDF reporting on SQLite.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod export;
mod importer;
mod models;
mod stats;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Agro Mopomulo Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config);
    let secret = state.config.jwt_secret.clone();

    // Public reads plus the citizen submission and upload endpoints
    let public_routes = Router::new()
        .route("/auth/register", post(api::register))
        .route("/auth/login", post(api::login))
        .route("/opd", get(api::list_opd))
        .route("/opd/{id}", get(api::get_opd))
        .route("/partisipasi", get(api::list_partisipasi))
        .route("/partisipasi", post(api::create_partisipasi))
        .route("/partisipasi/{id}", get(api::get_partisipasi))
        .route("/settings", get(api::get_settings))
        .route("/upload/image", post(api::upload_image))
        .route("/gallery", get(api::list_gallery))
        .route("/edukasi", get(api::list_edukasi))
        .route("/agenda", get(api::list_agenda))
        .route("/agenda/upcoming", get(api::upcoming_agenda))
        .route("/berita", get(api::list_berita))
        .route("/berita/active", get(api::active_berita))
        .route("/berita/{id}", get(api::get_berita))
        .route("/stats", get(api::get_stats))
        .route("/progress", get(api::get_progress))
        .route("/kontak-whatsapp", get(api::get_kontak))
        .route("/health", get(health_check));

    // Admin surface behind the bearer-token layer
    let protected_routes = Router::new()
        .route("/auth/me", get(api::me))
        .route("/opd", post(api::create_opd))
        .route("/opd/import", post(api::import_opd))
        .route("/opd/{id}", put(api::update_opd))
        .route("/opd/{id}", delete(api::delete_opd))
        .route("/partisipasi/{id}", put(api::update_partisipasi))
        .route("/partisipasi/{id}", delete(api::delete_partisipasi))
        .route("/settings", put(api::update_settings))
        .route("/settings/upload-logo", post(api::upload_logo))
        .route("/gallery", post(api::create_gallery))
        .route("/gallery/{id}", delete(api::delete_gallery))
        .route("/edukasi", post(api::create_edukasi))
        .route("/edukasi/{id}", put(api::update_edukasi))
        .route("/edukasi/{id}", delete(api::delete_edukasi))
        .route("/agenda", post(api::create_agenda))
        .route("/agenda/{id}", put(api::update_agenda))
        .route("/agenda/{id}", delete(api::delete_agenda))
        .route("/berita", post(api::create_berita))
        .route("/berita/{id}", put(api::update_berita))
        .route("/berita/{id}", delete(api::delete_berita))
        .route("/kontak-whatsapp", post(api::save_kontak))
        .route("/deteksi-ganda", get(api::get_duplicates))
        .route("/deteksi-ganda/hapus", delete(api::delete_duplicates))
        .route("/deteksi-ganda/gabung", post(api::merge_duplicates))
        .route("/export/excel", get(api::export_excel))
        .route("/export/pdf", get(api::export_pdf))
        .route("/import/excel", post(api::import_excel))
        .layer(middleware::from_fn(move |req, next| {
            auth::bearer_auth_layer(secret.clone(), req, next)
        }));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS configuration: any origin unless an explicit list is configured.
fn build_cors(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

/// GET /api/health - Health check endpoint.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "Agro Mopomulo API",
    })
}
