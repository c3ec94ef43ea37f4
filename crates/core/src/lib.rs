//! Core report logic for DTE Reports.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, filter semantics, and the export pipeline
//! live here.
//!
//! # Modules
//!
//! - `codes` - Document-type code table shared by list and export paths
//! - `document` - Immutable DTE document snapshot
//! - `filter` - Filter criteria, boundary parsing, timezone normalization
//! - `export` - Spreadsheet row mapping and workbook writing

pub mod codes;
pub mod document;
pub mod export;
pub mod filter;

pub use document::DteDocument;
pub use filter::{DteFilter, DteFilterParams};
