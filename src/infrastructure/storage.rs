use crate::config::ServerConfig;
use crate::services::storage::LocalStorageService;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &ServerConfig) -> anyhow::Result<Arc<LocalStorageService>> {
    info!("📁 Local Storage: {}", config.storage_dir.display());

    // Creates the directory when missing.
    let storage = LocalStorageService::new(&config.storage_dir)
        .await
        .with_context(|| {
            format!(
                "failed to prepare storage directory {}",
                config.storage_dir.display()
            )
        })?;

    info!("✅ Storage directory '{}' is ready", storage.root().display());
    Ok(Arc::new(storage))
}
