use std::env;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    MySql,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub storage: StorageBackend,
    /// Required when `storage` is MySQL.
    pub database_url: Option<String>,
    pub api_prefix: String,
    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let storage: StorageBackend = var("STORAGE_BACKEND", "mysql")
            .parse()
            .context("STORAGE_BACKEND must be `mysql` or `memory`")?;

        let database_url = lookup("DATABASE_URL");
        if storage == StorageBackend::MySql && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND is mysql");
        }

        let log_level = var("LOG_LEVEL", "debug")
            .parse()
            .context("LOG_LEVEL must be one of trace, debug, info, warn, error")?;

        let mut api_prefix = var("API_PREFIX", "/api");
        if !api_prefix.starts_with('/') {
            api_prefix.insert(0, '/');
        }

        Ok(Self {
            server_addr: var("SERVER_ADDR", "0.0.0.0:8000"),
            storage,
            database_url,
            api_prefix: api_prefix.trim_end_matches('/').to_string(),
            log_dir: var("LOG_DIR", "logs"),
            log_level,
        })
    }
}
