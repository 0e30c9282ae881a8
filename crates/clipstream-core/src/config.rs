//! Configuration module
//!
//! Environment-driven configuration for the API binary. Values are read once
//! at startup via `Config::from_env` and validated before any service starts.

use std::env;

use crate::constants::{MAX_THUMBNAIL_BYTES, MAX_VIDEO_BYTES};

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STORAGE_PATH: &str = "./data/blobs";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Root directory for video and thumbnail blobs.
    pub storage_path: String,
    /// Public base URL used when building stream/thumbnail URLs.
    pub base_url: String,
    pub cors_origins: Vec<String>,
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
    pub environment: String,
}

impl Config {
    /// Load configuration from the environment (`.env` honored if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        Ok(Config {
            server_port: parse_env("SERVER_PORT", DEFAULT_SERVER_PORT),
            database_url,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            db_timeout_seconds: parse_env("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS),
            storage_path: env::var("STORAGE_PATH")
                .unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string()),
            base_url: env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            cors_origins: parse_list(env::var("CORS_ORIGINS").ok().as_deref()),
            max_video_size_bytes: parse_env("MAX_VIDEO_SIZE_BYTES", MAX_VIDEO_BYTES),
            max_thumbnail_size_bytes: parse_env("MAX_THUMBNAIL_SIZE_BYTES", MAX_THUMBNAIL_BYTES),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Fail-fast sanity checks, run once at startup.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_url.is_empty() {
            anyhow::bail!("DATABASE_URL must not be empty");
        }
        if self.storage_path.is_empty() {
            anyhow::bail!("STORAGE_PATH must not be empty");
        }
        if self.max_video_size_bytes == 0 || self.max_thumbnail_size_bytes == 0 {
            anyhow::bail!("upload size limits must be non-zero");
        }
        if self.base_url.ends_with('/') {
            anyhow::bail!("BASE_URL must not end with a trailing slash");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
