//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for the document broker
//! - Application state
//! - Error-to-response translation

pub mod routes;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use docvault_core::document::DocumentService;
use docvault_core::storage::ObjectStoreClient;

/// The concrete broker wired to the OpenDAL storage client.
pub type Broker = DocumentService<ObjectStoreClient>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Document broker service.
    pub documents: Arc<Broker>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
