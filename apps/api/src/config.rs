use anyhow::{Context, Result};

const DEFAULT_TUTOR_API_URL: &str = "http://localhost:8000";

/// Application configuration loaded from environment variables.
/// Fails at startup if a numeric variable is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote tutoring API (problem bank, worksheet renderer).
    pub tutor_api_url: String,
    pub tutor_api_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            tutor_api_url: std::env::var("TUTOR_API_URL")
                .unwrap_or_else(|_| DEFAULT_TUTOR_API_URL.to_string()),
            tutor_api_timeout_secs: std::env::var("TUTOR_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("TUTOR_API_TIMEOUT_SECS must be a whole number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
