//! Runtime configuration, read from the environment (and `.env` via `dotenvy`).

use crate::fetch::DEFAULT_USER_AGENT;

pub const DEFAULT_BASE_URL: &str = "https://promote.telegram.org/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the promotion platform; `stats/` and `csv/` are resolved against it.
    pub base_url: String,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Reads `PROMOTE_BASE_URL` and `PROMOTE_USER_AGENT`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup("PROMOTE_BASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_url),
            user_agent: lookup("PROMOTE_USER_AGENT")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.user_agent),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PROMOTE_BASE_URL", "http://localhost:8080/"),
            ("PROMOTE_USER_AGENT", "test-agent"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.base_url, "http://localhost:8080/");
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = Config::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_with_base_url() {
        let config = Config::default().with_base_url("http://example.test/");
        assert_eq!(config.base_url, "http://example.test/");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
