//! Shared types, errors, and configuration for DTE Reports.
//!
//! This crate provides common types used across all other crates:
//! - Pagination types for the document list endpoint
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
