//! Store reference routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use tracing::error;

use crate::AppState;
use crate::error::error_response;
use dte_reports_db::{TiendaRepository, entities::tiendas};
use dte_reports_shared::AppError;

/// Creates the store reference routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/tiendas", get(list_tiendas))
}

/// One store in the reference list, ordered by code.
#[derive(Debug, Serialize)]
pub struct TiendaResponse {
    /// Store identifier.
    pub id: i32,
    /// Store code.
    pub codigo: String,
    /// Store display name.
    pub nombre: String,
}

impl From<tiendas::Model> for TiendaResponse {
    fn from(model: tiendas::Model) -> Self {
        Self {
            id: model.id,
            codigo: model.codigo,
            nombre: model.nombre,
        }
    }
}

/// GET /tiendas
///
/// Lists every store, ordered by code, for the filter dropdown.
#[axum::debug_handler]
async fn list_tiendas(State(state): State<AppState>) -> impl IntoResponse {
    let repo = TiendaRepository::new(state.db.clone());

    match repo.list_all().await {
        Ok(stores) => {
            let data: Vec<TiendaResponse> = stores.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list stores");
            error_response(&AppError::Database("Failed to list stores".into()))
        }
    }
}
