//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod dtes;
pub mod health;
pub mod tiendas;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(dtes::routes())
        .merge(tiendas::routes())
}
