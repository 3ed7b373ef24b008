use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

mod catalog;
mod config;
mod routes;
mod storage;
mod upload;

use catalog::{CatalogStore, MemoryCatalog, SqliteCatalog};
use config::{ServerConfig, IN_MEMORY_DATABASE};
use storage::DiskStorage;
use upload::UploadService;

/// Largest accepted upload request body
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub uploads: UploadService,
    pub catalog: Arc<dyn CatalogStore>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=info,tower_http=info".into()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("Server failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ServerConfig::from_env()?;

    let catalog: Arc<dyn CatalogStore> = if config.database == IN_MEMORY_DATABASE {
        tracing::warn!("Using in-memory catalog; records are lost on exit");
        Arc::new(MemoryCatalog::default())
    } else {
        Arc::new(SqliteCatalog::open(std::path::Path::new(&config.database))?)
    };
    let storage = Arc::new(DiskStorage::new(&config.upload_dir)?);
    let uploads_dir = storage.root().to_path_buf();

    let state = AppState {
        uploads: UploadService::new(storage, catalog.clone()),
        catalog,
    };

    let app = Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/files", get(routes::list_files))
        .route(
            "/api/upload",
            post(routes::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest_service(shared::UPLOADS_PREFIX, ServeDir::new(uploads_dir))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(
        "Server running on http://{} (uploads in {}, catalog {})",
        config.addr,
        config.upload_dir.display(),
        config.database
    );
    axum::serve(listener, app).await?;
    Ok(())
}
