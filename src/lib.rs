use std::path::Path;
use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::warn;

pub mod assets;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod seed;

/// Shared application state. Cheap to clone: the pool and base URL are shared handles.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    /// Public URL that relative `imagen_url` values are resolved against.
    pub static_base_url: Arc<str>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, static_base_url: impl Into<Arc<str>>) -> Self {
        Self {
            db,
            static_base_url: static_base_url.into(),
        }
    }
}

pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))

        // ── Products ────────────────────────────────────────────────────────
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/products/:id/stock",
            patch(handlers::products::update_stock),
        );

    // ── Static assets ───────────────────────────────────────────────────────
    let router = match static_dir {
        Some(dir) if dir.is_dir() => router.nest_service("/static", ServeDir::new(dir)),
        Some(dir) => {
            warn!(
                dir = %dir.display(),
                "Static directory not found, local images will not be served"
            );
            router
        }
        None => router,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
