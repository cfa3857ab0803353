//! Environment-driven configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::schema::SchemaSettings;
use crate::{Result, StoreLocatorError};

pub const BIND_ADDR_VAR: &str = "STORE_LOCATOR_BIND_ADDR";
pub const LOG_LEVEL_VAR: &str = "STORE_LOCATOR_LOG_LEVEL";
pub const DATA_FILE_VAR: &str = "STORE_LOCATOR_DATA_FILE";
pub const GRAPHQL_PATH_VAR: &str = "STORE_LOCATOR_GRAPHQL_PATH";
pub const MAX_PAGE_SIZE_VAR: &str = "STORE_LOCATOR_MAX_PAGE_SIZE";

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// JSON seed file; an empty store list is served when unset
    pub data_file: Option<PathBuf>,
    pub graphql_path: String,
    pub max_page_size: usize,
}

impl LocatorConfig {
    /// Load from the process environment after reading `.env` if present
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load from variables already in the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary lookup, so parsing can be tested without
    /// touching the real environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |var: &str, default: &str| -> String {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let invalid = |var: &str, reason: String| StoreLocatorError::Config {
            var: var.to_string(),
            reason,
        };

        let bind_addr = or_default(BIND_ADDR_VAR, "0.0.0.0:4000")
            .parse::<SocketAddr>()
            .map_err(|e| invalid(BIND_ADDR_VAR, e.to_string()))?;

        let max_page_size = or_default(MAX_PAGE_SIZE_VAR, "100")
            .parse::<usize>()
            .map_err(|e| invalid(MAX_PAGE_SIZE_VAR, e.to_string()))?;
        if max_page_size == 0 {
            return Err(invalid(MAX_PAGE_SIZE_VAR, "must be at least 1".to_string()));
        }

        let graphql_path = or_default(GRAPHQL_PATH_VAR, "/graphql");
        if !graphql_path.starts_with('/') {
            return Err(invalid(GRAPHQL_PATH_VAR, "must start with '/'".to_string()));
        }

        Ok(Self {
            bind_addr,
            log_level: or_default(LOG_LEVEL_VAR, "info"),
            data_file: lookup(DATA_FILE_VAR)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            graphql_path,
            max_page_size,
        })
    }

    pub fn schema_settings(&self) -> SchemaSettings {
        SchemaSettings {
            max_page_size: self.max_page_size,
        }
    }
}
