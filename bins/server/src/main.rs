//! DocVault API Server
//!
//! Main entry point for the document broker service.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docvault_api::{AppState, create_router};
use docvault_core::document::{DocumentService, DownloadStats, TokenStore};
use docvault_core::storage::{ObjectStoreClient, StorageConfig};
use docvault_shared::{AppConfig, config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docvault=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let sources = config::builder()?;
    let storage_config: StorageConfig = sources.get("storage")?;
    let app_config: AppConfig = sources.try_deserialize()?;

    // Create storage client
    let storage = ObjectStoreClient::from_config(storage_config)?;
    info!(
        provider = storage.provider_name(),
        bucket = storage.bucket(),
        "Storage client configured"
    );

    // Create document broker
    let tokens = TokenStore::with_ttl(Duration::from_secs(app_config.sharing.token_ttl_secs));
    let stats = DownloadStats::with_ttl(Duration::from_secs(
        app_config.sharing.download_count_ttl_secs,
    ));
    let documents = DocumentService::new(
        Arc::new(storage),
        Arc::new(tokens),
        Arc::new(stats),
        app_config.server.public_url.clone(),
    );

    // Create application state
    let state = AppState {
        documents: Arc::new(documents),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
