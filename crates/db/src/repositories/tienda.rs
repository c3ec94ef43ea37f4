//! Store reference repository.
//!
//! Read-only lookup used to populate the store filter selector.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::entities::tiendas;

/// Error types for store lookups.
#[derive(Debug, thiserror::Error)]
pub enum TiendaError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for the store reference table. Holds a shared handle to the
/// connection pool.
#[derive(Debug, Clone)]
pub struct TiendaRepository {
    db: Arc<DatabaseConnection>,
}

impl TiendaRepository {
    /// Creates a new store repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists all stores, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<tiendas::Model>, TiendaError> {
        Ok(tiendas::Entity::find()
            .order_by_asc(tiendas::Column::Codigo)
            .all(self.db.as_ref())
            .await?)
    }
}
