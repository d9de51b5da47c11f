//! Shared error taxonomy and configuration for Docvault.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error taxonomy with HTTP status mapping
//! - Configuration management

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
