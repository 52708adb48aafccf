//! Client configuration resolved from the environment.

use std::time::Duration;

/// Base URL used when `PLAYLIST_API_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Per-request timeout used when `PLAYLIST_API_TIMEOUT_SECS` is unset or invalid.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const BASE_URL_VAR: &str = "PLAYLIST_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "PLAYLIST_API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = lookup(TIMEOUT_VAR)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self { base_url, timeout }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn falls_back_to_defaults() {
        assert_eq!(ApiConfig::from_lookup(lookup(&[])), ApiConfig::default());
        assert_eq!(ApiConfig::default().base_url, "http://localhost:8000/api");
    }

    #[test]
    fn reads_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "https://music.example.com/api"),
            (TIMEOUT_VAR, "3"),
        ]));
        assert_eq!(config.base_url, "https://music.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_url_and_bad_timeout_use_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[(BASE_URL_VAR, "  "), (TIMEOUT_VAR, "soon")]));
        assert_eq!(config, ApiConfig::default());

        let config = ApiConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "0")]));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}
