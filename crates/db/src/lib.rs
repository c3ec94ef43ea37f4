//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the `v_dtes` view and the `tiendas`
//!   reference table
//! - Repository abstractions for counting, paging, and exporting documents

pub mod entities;
pub mod repositories;

pub use repositories::{DteReportRepository, TiendaRepository};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
