//! Application setup and initialization
//!
//! Startup logic lives here rather than in main.rs so tests can assemble the
//! same pieces with substitute backends.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use anyhow::{Context, Result};
use std::sync::Arc;

use clipstream_core::Config;
use clipstream_db::{PgTagIndex, PgVideoCatalog};

use crate::state::AppState;

/// Initialize the entire application: config validation, telemetry, database
/// pool + migrations, blob storage, and the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production());
    tracing::info!("Configuration loaded and validated");

    let pool = database::setup_database(&config).await?;
    let blobs = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(
        Arc::new(PgVideoCatalog::new(pool.clone())),
        Arc::new(PgTagIndex::new(pool)),
        blobs,
        config,
    ));

    let router = routes::build_router(state.clone());

    Ok((state, router))
}
