//! Configuration module for the SAGE backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default Gemini model used for completions.
pub const DEFAULT_LLM_MODEL: &str = "gemini-1.5-flash";
/// Default Gemini REST endpoint.
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Base URL used to build public survey links
    pub public_url: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// LLM settings
    pub llm: LlmConfig,
}

/// Settings for the completion collaborator.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key; LLM-backed endpoints fail when absent
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Invalid environment value.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {var}: {value:?}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("SAGE_DB_PATH")
            .unwrap_or_else(|_| "./data/sage.sqlite".to_string())
            .into();

        let bind_raw = env::var("SAGE_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|_| ConfigError {
            var: "SAGE_BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let public_url = env::var("SAGE_PUBLIC_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://{}", bind_addr));

        let log_level = env::var("SAGE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let timeout_raw = env::var("SAGE_LLM_TIMEOUT_SECS").unwrap_or_else(|_| "60".to_string());
        let timeout_secs: u64 = timeout_raw.parse().map_err(|_| ConfigError {
            var: "SAGE_LLM_TIMEOUT_SECS",
            value: timeout_raw.clone(),
        })?;

        let llm = LlmConfig {
            api_key: env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: env::var("SAGE_LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            base_url: env::var("SAGE_LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            db_path,
            bind_addr,
            public_url,
            log_level,
            llm,
        })
    }
}
