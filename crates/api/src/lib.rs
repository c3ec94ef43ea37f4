//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for the DTE report (list, export, store selector)
//! - Response types

pub mod error;
pub mod routes;

use axum::Router;
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Store-local time zone; date filters are interpreted and exported
    /// timestamps rendered in this zone.
    pub timezone: Tz,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
