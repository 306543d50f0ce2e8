use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Http,
}

impl StoreBackend {
    fn from_env(raw: &str) -> Result<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "http" | "remote" => Ok(Self::Http),
            _ => Err(anyhow::anyhow!("STORE_BACKEND must be one of: memory, http")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub store_endpoint: String,
    pub store_auth_key: String,
    pub database: String,
    pub collection: String,
    /// Base URL of the values API. When unset the index page reads the
    /// local catalog instead of calling out.
    pub api_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let store_backend = StoreBackend::from_env(
            &env::var("STORE_BACKEND").unwrap_or_else(|_| "memory".to_string()),
        )?;

        let store_endpoint = env::var("STORE_ENDPOINT").unwrap_or_default();
        let store_auth_key = env::var("STORE_AUTH_KEY").unwrap_or_default();
        if store_backend == StoreBackend::Http {
            if store_endpoint.is_empty() {
                anyhow::bail!("STORE_ENDPOINT is required when STORE_BACKEND is http");
            }
            if store_auth_key.is_empty() {
                anyhow::bail!("STORE_AUTH_KEY is required when STORE_BACKEND is http");
            }
        }

        let database = env::var("STORE_DATABASE").unwrap_or_else(|_| "ToDoList".to_string());
        let collection = env::var("STORE_COLLECTION").unwrap_or_else(|_| "Items".to_string());

        let api_url = env::var("API_URL").ok().filter(|url| !url.is_empty());

        Ok(Self {
            host,
            port,
            store_backend,
            store_endpoint,
            store_auth_key,
            database,
            collection,
            api_url,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
