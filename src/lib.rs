#![forbid(unsafe_code)]

//! Product catalog service: an axum REST API over a sea-orm backed store,
//! plus a typed client and a list-view driver for interactive consumers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

pub mod client;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use config::AppConfig;
use services::ProductCatalogService;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: AppConfig,
    pub catalog: ProductCatalogService,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: AppConfig) -> Self {
        let catalog = ProductCatalogService::new(db.clone());
        Self { db, config, catalog }
    }
}

async fn root() -> &'static str {
    "catalog-api up"
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "database unreachable"),
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/products", handlers::products::products_routes())
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
