use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    pub email: Option<String>,    // signs in before fetching recommendations when set
    pub password: Option<String>,
}

impl Config {
    /// Email and password pair, if both are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    config_from(|key| std::env::var(key).ok())
}

fn config_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let base_url = lookup("SWARA_BASE_URL")
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let timeout_secs = match lookup("SWARA_TIMEOUT_SECS") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("SWARA_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"))?,
        None => DEFAULT_TIMEOUT_SECS,
    };

    Ok(Config {
        base_url,
        timeout: Duration::from_secs(timeout_secs),
        email: lookup("SWARA_EMAIL").filter(|v| !v.is_empty()),
        password: lookup("SWARA_PASSWORD").filter(|v| !v.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config_from(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = from_pairs(&[]).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_reads_every_variable() {
        let config = from_pairs(&[
            ("SWARA_BASE_URL", "https://swara.example"),
            ("SWARA_TIMEOUT_SECS", "3"),
            ("SWARA_EMAIL", "ravi@example.com"),
            ("SWARA_PASSWORD", "raaga123"),
        ])
        .unwrap();

        assert_eq!(config.base_url, "https://swara.example");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.credentials(), Some(("ravi@example.com", "raaga123")));
    }

    #[test]
    fn test_bad_timeout_is_an_error() {
        let err = from_pairs(&[("SWARA_TIMEOUT_SECS", "soon")]).unwrap_err();

        assert!(err.to_string().contains("SWARA_TIMEOUT_SECS"));
    }

    #[test]
    fn test_credentials_need_both_values() {
        let config = from_pairs(&[("SWARA_EMAIL", "ravi@example.com")]).unwrap();

        assert!(config.credentials().is_none());
    }
}
