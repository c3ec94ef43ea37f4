//! Repository abstractions for data access.

pub mod dte;
pub mod tienda;

pub use dte::DteReportRepository;
pub use tienda::TiendaRepository;
