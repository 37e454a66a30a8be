use dotenv::dotenv;
use std::env;
use thiserror::Error;

const DEFAULT_DATABASE_NAME: &str = "people";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_BASE_PATH: &str = "/people";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub bind_address: String,
    pub base_path: String,
}

impl AppConfig {

    pub fn from_env() -> Result<AppConfig, ConfigError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(AppConfig {
            database_url,
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string()),
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            base_path: normalize_base_path(
                &env::var("BASE_PATH").unwrap_or_else(|_| DEFAULT_BASE_PATH.to_string())
            ),
        })
    }
}

/// Leading slash, no trailing slash; the root mount becomes "".
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
