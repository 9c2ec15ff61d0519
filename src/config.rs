use crate::errors::ConfigError;
use std::{env, time::Duration};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base url of the trip API, without a trailing slash.
    pub api_base_url: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = env::var("TRIP_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let port = env::var("PORT").ok();
        let timeout = env::var("TRIP_API_TIMEOUT_SECS").ok();
        Self::from_values(&base, port.as_deref(), timeout.as_deref())
    }

    pub fn from_values(
        base: &str,
        port: Option<&str>,
        timeout_secs: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let api_base_url = normalize_base_url(base)?;

        let port = port
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let timeout_secs = timeout_secs
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_base_url,
            port,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn normalize_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|source| ConfigError::BaseUrl {
        value: value.to_string(),
        source,
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::Scheme(parsed.scheme().to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_values(DEFAULT_API_BASE_URL, None, None).unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080");
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn bad_port_falls_back_to_default() {
        let config = Config::from_values("http://trips.local", Some("not-a-port"), Some("0")).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let config = Config::from_values("https://trips.local/v1/", Some("9000"), None).unwrap();
        assert_eq!(config.api_base_url, "https://trips.local/v1");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            Config::from_values("not a url", None, None),
            Err(ConfigError::BaseUrl { .. })
        ));
        assert!(matches!(
            Config::from_values("ftp://trips.local", None, None),
            Err(ConfigError::Scheme(_))
        ));
    }
}
