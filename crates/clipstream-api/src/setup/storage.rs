//! Blob storage setup.

use anyhow::{Context, Result};
use std::sync::Arc;

use clipstream_core::Config;
use clipstream_storage::{BlobStore, LocalBlobStore};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStore>> {
    let store = LocalBlobStore::new(config.storage_path.clone())
        .await
        .context("Failed to initialize blob storage")?;

    tracing::info!(path = %config.storage_path, "Blob storage ready");

    Ok(Arc::new(store))
}
