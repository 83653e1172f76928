/// Server configuration
/// Read from the environment (after `.env` is loaded by the binary)

use anyhow::{anyhow, Result};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3002;
pub const DEFAULT_GEO_HEADER: &str = "x-vercel-ip-country";
pub const DEFAULT_USER_ID_HEADER: &str = "x-user-id";
pub const DEFAULT_PREFERENCE_TABLE: &str = "user_currency_preferences";
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Edge-injected header carrying the visitor's country
    pub geo_header: String,
    /// Header the auth gateway uses to pass the authenticated user id
    pub user_id_header: String,
    /// PostgREST root of the hosted profile store; `None` keeps preferences in memory
    pub preference_store_url: Option<String>,
    pub preference_store_key: Option<String>,
    pub preference_store_table: String,
    pub store_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            geo_header: DEFAULT_GEO_HEADER.to_string(),
            user_id_header: DEFAULT_USER_ID_HEADER.to_string(),
            preference_store_url: None,
            preference_store_key: None,
            preference_store_table: DEFAULT_PREFERENCE_TABLE.to_string(),
            store_timeout: Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| anyhow!("PORT must be a port number, got '{}': {}", raw, e))?,
            None => DEFAULT_PORT,
        };

        let store_timeout = match non_empty("PREFERENCE_STORE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                anyhow!("PREFERENCE_STORE_TIMEOUT_SECS must be whole seconds, got '{}': {}", raw, e)
            })?),
            None => Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECS),
        };

        Ok(Self {
            port,
            geo_header: non_empty("GEO_COUNTRY_HEADER")
                .map(|h| h.to_ascii_lowercase())
                .unwrap_or_else(|| DEFAULT_GEO_HEADER.to_string()),
            user_id_header: non_empty("USER_ID_HEADER")
                .map(|h| h.to_ascii_lowercase())
                .unwrap_or_else(|| DEFAULT_USER_ID_HEADER.to_string()),
            preference_store_url: non_empty("PREFERENCE_STORE_URL"),
            preference_store_key: non_empty("PREFERENCE_STORE_KEY"),
            preference_store_table: non_empty("PREFERENCE_STORE_TABLE")
                .unwrap_or_else(|| DEFAULT_PREFERENCE_TABLE.to_string()),
            store_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.geo_header, "x-vercel-ip-country");
        assert!(config.preference_store_url.is_none());
        assert_eq!(config.store_timeout, Duration::from_secs(5));
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("GEO_COUNTRY_HEADER", "CF-IPCountry"),
            ("PREFERENCE_STORE_URL", "https://db.example.com/rest/v1"),
            ("PREFERENCE_STORE_TIMEOUT_SECS", "2"),
            ("PREFERENCE_STORE_KEY", "   "),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.geo_header, "cf-ipcountry");
        assert_eq!(
            config.preference_store_url.as_deref(),
            Some("https://db.example.com/rest/v1")
        );
        assert_eq!(config.store_timeout, Duration::from_secs(2));
        assert!(config.preference_store_key.is_none());
    }

    #[test]
    fn rejects_bad_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
