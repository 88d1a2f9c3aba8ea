// Client configuration read from environment variables. Every key has a
// default so the client runs against a local development server with no
// setup at all.

use crate::controller::{ControllerSettings, ReplaceOrdering};
use crate::error::ConfigError;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    /// Explicit anti-forgery token; when absent it is discovered from the index page.
    pub csrf_token: Option<String>,
    pub timeout: Duration,
    pub controller: ControllerSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: DEFAULT_API_URL.to_string(),
            csrf_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            controller: ControllerSettings::default(),
        }
    }
}

impl ClientConfig {
    /// Load from `CUPCAKES_API_URL`, `CUPCAKES_CSRF_TOKEN`,
    /// `CUPCAKES_TIMEOUT_SECS`, `CUPCAKES_CLEAR_FORM_ON_FAILED_CREATE` and
    /// `CUPCAKES_ORDERING`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ClientConfig::default();

        let api_url = lookup("CUPCAKES_API_URL").unwrap_or_else(|| {
            debug!(event = "config.default_used", key = "CUPCAKES_API_URL", value = DEFAULT_API_URL);
            defaults.api_url.clone()
        });

        let csrf_token = lookup("CUPCAKES_CSRF_TOKEN").filter(|t| !t.trim().is_empty());

        let timeout = match lookup("CUPCAKES_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().ok().filter(|s| *s > 0);
                Duration::from_secs(secs.ok_or(ConfigError::InvalidValue {
                    key: "CUPCAKES_TIMEOUT_SECS",
                    value: raw.clone(),
                })?)
            }
            None => defaults.timeout,
        };

        let clear_form_on_failed_create = match lookup("CUPCAKES_CLEAR_FORM_ON_FAILED_CREATE") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidValue {
                key: "CUPCAKES_CLEAR_FORM_ON_FAILED_CREATE",
                value: raw.clone(),
            })?,
            None => defaults.controller.clear_form_on_failed_create,
        };

        let ordering = match lookup("CUPCAKES_ORDERING") {
            Some(raw) => raw.parse::<ReplaceOrdering>().map_err(|_| ConfigError::InvalidValue {
                key: "CUPCAKES_ORDERING",
                value: raw.clone(),
            })?,
            None => ReplaceOrdering::default(),
        };

        Ok(ClientConfig {
            api_url,
            csrf_token,
            timeout,
            controller: ControllerSettings {
                clear_form_on_failed_create,
                ordering,
            },
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(config.controller.clear_form_on_failed_create);
        assert_eq!(config.controller.ordering, ReplaceOrdering::LastResolvedWins);
    }

    #[test]
    fn test_all_keys_are_read() {
        let config = load(&[
            ("CUPCAKES_API_URL", "http://cupcakes.test:8080"),
            ("CUPCAKES_CSRF_TOKEN", "abc"),
            ("CUPCAKES_TIMEOUT_SECS", "3"),
            ("CUPCAKES_CLEAR_FORM_ON_FAILED_CREATE", "false"),
            ("CUPCAKES_ORDERING", "latest-issued"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "http://cupcakes.test:8080");
        assert_eq!(config.csrf_token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(!config.controller.clear_form_on_failed_create);
        assert_eq!(config.controller.ordering, ReplaceOrdering::LatestIssuedWins);
    }

    #[test]
    fn test_blank_csrf_token_is_ignored() {
        let config = load(&[("CUPCAKES_CSRF_TOKEN", "  ")]).unwrap();
        assert_eq!(config.csrf_token, None);
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let err = load(&[("CUPCAKES_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("CUPCAKES_TIMEOUT_SECS"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = load(&[("CUPCAKES_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("CUPCAKES_TIMEOUT_SECS"));
    }

    #[test]
    fn test_invalid_flag_is_rejected() {
        assert!(load(&[("CUPCAKES_CLEAR_FORM_ON_FAILED_CREATE", "maybe")]).is_err());
    }

    #[test]
    fn test_invalid_ordering_is_rejected() {
        assert!(load(&[("CUPCAKES_ORDERING", "first")]).is_err());
    }
}
