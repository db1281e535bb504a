use std::env;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use strum_macros::{Display, EnumString};

/// Where records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    Mysql,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is `Mysql`
    pub database_url: Option<String>,

    // Rate limiting
    pub rate_api_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store_backend: StoreBackend = match lookup("STORE_BACKEND") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("STORE_BACKEND must be mysql or memory, got {raw:?}"))?,
            None => StoreBackend::Memory,
        };

        let database_url = lookup("DATABASE_URL");
        if store_backend == StoreBackend::Mysql && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set when STORE_BACKEND=mysql");
        }

        let rate_api_per_min: u32 = lookup("RATE_API_PER_MIN")
            .unwrap_or_else(|| "1000".to_string())
            .parse()
            .context("RATE_API_PER_MIN must be a non-negative integer")?;

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            store_backend,
            database_url,
            rate_api_per_min,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }
}
