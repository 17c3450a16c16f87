use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::language::Language;

pub const DEFAULT_ML_SERVICE_URL: &str = "http://localhost:5000";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;

/// Runtime settings for the gateway server.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub ml_service_url: String,
    pub upstream_timeout: Duration,
    pub default_language: Language,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ml_service_url: DEFAULT_ML_SERVICE_URL.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            default_language: Language::En,
        }
    }
}

impl GatewayConfig {
    /// Read settings from the process environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => defaults.port,
        };

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().with_context(|| {
                    format!("UPSTREAM_TIMEOUT_SECS must be whole seconds, got {:?}", raw)
                })?;
                if secs == 0 {
                    anyhow::bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => defaults.upstream_timeout,
        };

        let ml_service_url = lookup("ML_SERVICE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.ml_service_url);

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            ml_service_url,
            upstream_timeout,
            default_language: lookup("DEFAULT_LANGUAGE")
                .map(|code| Language::from_code(&code))
                .unwrap_or(defaults.default_language),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<GatewayConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.ml_service_url, "http://localhost:5000");
        assert_eq!(config.upstream_timeout, Duration::from_secs(15));
        assert_eq!(config.default_language, Language::En);
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("PORT", "8088"),
            ("ML_SERVICE_URL", "http://ml:5000/"),
            ("UPSTREAM_TIMEOUT_SECS", "3"),
            ("DEFAULT_LANGUAGE", "rw"),
        ])
        .unwrap();
        assert_eq!(config.port, 8088);
        assert_eq!(config.ml_service_url, "http://ml:5000");
        assert_eq!(config.upstream_timeout, Duration::from_secs(3));
        assert_eq!(config.default_language, Language::Rw);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("UPSTREAM_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[("UPSTREAM_TIMEOUT_SECS", "-1")]).is_err());
    }
}
