use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_SERPER_BASE_URL: &str = "https://google.serper.dev";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if either API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub serper_api_key: String,
    pub openai_base_url: String,
    pub serper_base_url: String,
    /// Upper bound for the chat-completion call; expiry falls back to the warning text.
    pub llm_timeout: Duration,
    /// Upper bound for the search call; expiry omits the search portion.
    pub search_timeout: Duration,
    /// Root directory for per-request artifacts. `None` means a process-lifetime temp dir.
    pub artifact_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            serper_api_key: require_env("SERPER_API_KEY")?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            serper_base_url: std::env::var("SERPER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SERPER_BASE_URL.to_string()),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 30)?),
            search_timeout: Duration::from_secs(parse_env("SEARCH_TIMEOUT_SECS", 15)?),
            artifact_dir: std::env::var("ARTIFACT_DIR").ok().map(PathBuf::from),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn test_default() -> Self {
        Config {
            openai_api_key: "sk-test".to_string(),
            serper_api_key: "serper-test".to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            serper_base_url: DEFAULT_SERPER_BASE_URL.to_string(),
            llm_timeout: Duration::from_secs(5),
            search_timeout: Duration::from_secs(5),
            artifact_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Renders a secret for logs: the first five characters followed by `*****`.
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(5).collect();
    format!("{prefix}*****")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secret_keeps_five_chars() {
        assert_eq!(mask_secret("sk-abcdef123456"), "sk-ab*****");
    }

    #[test]
    fn test_mask_secret_short_value() {
        assert_eq!(mask_secret("abc"), "abc*****");
    }

    #[test]
    fn test_require_env_missing_key_names_variable() {
        let err = require_env("RESUME_OPTIMIZER_TEST_SURELY_UNSET").unwrap_err();
        assert!(err.to_string().contains("RESUME_OPTIMIZER_TEST_SURELY_UNSET"));
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u64 = parse_env("RESUME_OPTIMIZER_TEST_UNSET_NUMBER", 42).unwrap();
        assert_eq!(value, 42);
    }
}
