//! Document access broker.
//!
//! This module provides the broker logic in front of the storage provider:
//! - File-type validation for uploads
//! - Expiring share-token issuance and verification
//! - Per-document download accounting
//! - The orchestrating [`DocumentService`]

mod error;
mod service;
mod stats;
mod token;
mod types;
pub mod validate;

pub use error::DocumentError;
pub use service::DocumentService;
pub use stats::DownloadStats;
pub use token::TokenStore;
pub use types::{DocumentView, SharedLink, UploadFile};
