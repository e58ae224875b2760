// src/bin/server.rs
//! Image vault HTTP server
//!
//! Config from `image-vault.toml` (or `$IMAGE_VAULT_CONFIG`), log level
//! from `RUST_LOG` (default `info`).

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use encrypted_image_vault::http::{router, AppState};
use encrypted_image_vault::{load_config, EncryptionPipeline, RecordRegistry, SqliteRegistry};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config().context("Failed to load configuration")?;

    let registry = Arc::new(
        SqliteRegistry::open(&config.paths.registry_db).with_context(|| {
            format!(
                "Failed to open registry at {}",
                config.paths.registry_db.display()
            )
        })?,
    );
    info!(
        registry = %config.paths.registry_db.display(),
        artifacts = %config.paths.artifact_root.display(),
        "registry opened"
    );

    let pipeline = EncryptionPipeline::from_config(
        &config,
        Arc::clone(&registry) as Arc<dyn RecordRegistry>,
    );
    let app = router(AppState::new(pipeline), &config.server);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server is running on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await
        .context("server error")?;

    // The router (and its pipeline handle) is gone once serve returns
    match Arc::try_unwrap(registry) {
        Ok(registry) => registry.close().context("Failed to close registry")?,
        Err(_) => warn!("registry still shared at shutdown; leaving it to drop"),
    }
    Ok(())
}
