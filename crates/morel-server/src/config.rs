//! RON configuration for the morel server

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Listen address (e.g. "127.0.0.1:8420")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Item database path
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Directory uploaded images are stored in
    #[serde(default = "default_asset_dir")]
    pub asset_dir: String,
    /// Upload size cap in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Credentials accepted by the session endpoint
    pub admin_username: String,
    pub admin_password: String,
    /// Change-feed broadcast buffer; subscribers that fall further behind
    /// are disconnected and resync
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// Seed the classic varieties into an empty database on startup
    #[serde(default)]
    pub seed: bool,
}

fn default_bind_address() -> String {
    "127.0.0.1:8420".to_string()
}

fn default_database_path() -> String {
    "morel.db".to_string()
}

fn default_asset_dir() -> String {
    "assets".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_event_buffer() -> usize {
    64
}

impl Config {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        ron::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }
}
