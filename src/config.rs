use crate::model::Granularity;
use chrono::{FixedOffset, Local};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct QueryConfig {
    pub query: String,
    /// Fixed bucket width for this query; chosen from the data span if unset.
    #[serde(default)]
    pub granularity: Option<Granularity>,
}

impl QueryConfig {
    /// The query as sent to the feeds: trimmed, case kept.
    pub fn search_term(&self) -> &str {
        self.query.trim()
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub queries: Vec<QueryConfig>,
    pub check_interval_seconds: u64,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// Offset of the clock used for day/week boundaries. Local time if unset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
    /// Default granularity for queries without their own.
    #[serde(default)]
    pub granularity: Option<Granularity>,
    /// Enables wishlist sync for this account.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub session_token: Option<String>,
}

fn default_timeout() -> u64 {
    10
}

impl AppConfig {
    /// Clock for bucket boundaries.
    pub fn clock(&self) -> Result<FixedOffset, ConfigError> {
        match self.utc_offset_minutes {
            Some(minutes) => FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
                ConfigError::Invalid(format!("utc_offset_minutes out of range: {}", minutes))
            }),
            None => Ok(*Local::now().offset()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base_url is empty".into()));
        }
        if self.queries.iter().any(|q| q.query.trim().is_empty()) {
            return Err(ConfigError::Invalid("queries must not contain empty strings".into()));
        }
        if self.check_interval_seconds == 0 {
            return Err(ConfigError::Invalid("check_interval_seconds must be positive".into()));
        }
        self.clock().map(|_| ())
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}
