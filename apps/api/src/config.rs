use anyhow::{Context, Result};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub webdriver_url: String,
    pub form_wait_secs: u64,
    pub workday_username: Option<String>,
    pub workday_password: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_api_base: env_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            host: env_or("HOST", "127.0.0.1"),
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            webdriver_url: env_or("WEBDRIVER_URL", DEFAULT_WEBDRIVER_URL),
            form_wait_secs: env_or("FORM_WAIT_SECS", "10")
                .parse::<u64>()
                .context("FORM_WAIT_SECS must be a whole number of seconds")?,
            workday_username: std::env::var("WORKDAY_USERNAME").ok(),
            workday_password: std::env::var("WORKDAY_PASSWORD").ok(),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Login credentials for the application form. Only the form filler needs them.
    pub fn form_credentials(&self) -> Result<(String, String)> {
        let username = self
            .workday_username
            .clone()
            .context("Required environment variable 'WORKDAY_USERNAME' is not set")?;
        let password = self
            .workday_password
            .clone()
            .context("Required environment variable 'WORKDAY_PASSWORD' is not set")?;
        Ok((username, password))
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
