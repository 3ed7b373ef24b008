//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_UPLOAD_DIR: &str = "public/uploads";
const DEFAULT_DATABASE: &str = "stlview.db";

/// Database value that selects the non-persistent in-memory catalog
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address (`STLVIEW_ADDR`)
    pub addr: SocketAddr,
    /// Directory holding uploaded blobs (`STLVIEW_UPLOAD_DIR`)
    pub upload_dir: PathBuf,
    /// SQLite catalog file (`STLVIEW_DATABASE`)
    pub database: String,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid STLVIEW_ADDR '{value}': {source}")]
pub struct ConfigError {
    value: String,
    #[source]
    source: std::net::AddrParseError,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = lookup("STLVIEW_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr
            .parse()
            .map_err(|source| ConfigError { value: addr.clone(), source })?;

        Ok(Self {
            addr,
            upload_dir: lookup("STLVIEW_UPLOAD_DIR")
                .unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string())
                .into(),
            database: lookup("STLVIEW_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        })
    }
}
