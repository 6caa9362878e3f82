//! # Listora API Server
//!
//! HTTP backend for the Listora catalog: categories, posts, plans, and
//! promotional banners, with a public paginated read surface and an
//! admin-gated write surface.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p listora-api
//! ```

use std::sync::Arc;

use listora_api::{
    app::{build_router, AppState},
    config::{Config, StorageConfig},
};
use listora_shared::{
    db::{migrations, pool},
    storage::{LocalStore, ObjectStore, S3Config, S3Store},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listora_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Listora API v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&db).await?;

    let storage: Arc<dyn ObjectStore> = match &config.storage {
        StorageConfig::Local { upload_dir } => {
            tracing::info!(upload_dir = %upload_dir, "Using local upload storage");
            Arc::new(LocalStore::new(upload_dir, "/uploads"))
        }
        StorageConfig::S3 {
            endpoint,
            region,
            bucket,
            access_key,
            secret_key,
            public_url,
        } => {
            tracing::info!(endpoint = %endpoint, bucket = %bucket, "Using S3 upload storage");
            Arc::new(
                S3Store::new(&S3Config::new(
                    endpoint.clone(),
                    region.clone(),
                    bucket.clone(),
                    access_key.clone(),
                    secret_key.clone(),
                    public_url.clone(),
                ))
                .await?,
            )
        }
    };

    let bind_address = config.bind_address();
    let state = AppState::new(db, config, storage);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
