//! `SeaORM` entity definitions.

pub mod dtes;
pub mod tiendas;
