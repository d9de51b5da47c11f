//! Core broker logic for Docvault.
//!
//! This crate contains pure broker logic with ZERO web dependencies.
//! All domain types, validation rules, and expiring state live here.
//!
//! # Modules
//!
//! - `cache` - Ephemeral expiring key-value store
//! - `document` - Access broker: upload validation, share tokens, download
//!   accounting, and the orchestrating service
//! - `storage` - Storage collaborator interface and OpenDAL-backed client

pub mod cache;
pub mod document;
pub mod storage;
