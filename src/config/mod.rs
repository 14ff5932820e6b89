//! Configuration module for the tool directory backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key the trusted frontend/proxy presents on `/api` routes
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// The one email address that is granted admin rights
    pub admin_email: String,
    /// Insert the sample tools when the tools table is empty
    pub seed_on_startup: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AddrParseError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("TOOLDIR_API_PSK").ok().filter(|s| !s.is_empty());

        let db_path = env::var("TOOLDIR_DB_PATH")
            .unwrap_or_else(|_| "./data/tooldir.sqlite".to_string())
            .into();

        let bind_addr = env::var("TOOLDIR_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()?;

        let log_level = env::var("TOOLDIR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("TOOLDIR_LOG_FORMAT")
            .map(|v| is_json_format(&v))
            .unwrap_or(false);

        let admin_email =
            env::var("TOOLDIR_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());

        let seed_on_startup = env::var("TOOLDIR_SEED_ON_STARTUP")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Ok(Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            log_json,
            admin_email,
            seed_on_startup,
        })
    }
}

fn is_json_format(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("json")
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}
