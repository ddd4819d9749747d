//! Configuration for the SafeGuard server.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::lawyers::lookup::DEFAULT_LOOKUP_TIMEOUT;

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is out of range or malformed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// A URL failed to parse.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Process configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SafeguardConfig {
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Base URL of the remote lawyer directory; fallback-only when absent.
    pub lawyer_api_url: Option<String>,
    /// Bound on one remote lawyer lookup.
    #[serde(with = "duration_serde")]
    pub lookup_timeout: Duration,
    /// Base URL of the priority-queue service.
    pub queue_api_url: Option<String>,
    /// Directory of static client assets.
    pub static_dir: PathBuf,
}

impl Default for SafeguardConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            lawyer_api_url: None,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            queue_api_url: None,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl SafeguardConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `SAFEGUARD_*` environment variables over the defaults.
    /// Unparseable numbers keep the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(port) = var("SAFEGUARD_PORT").and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Some(url) = var("SAFEGUARD_LAWYER_API").filter(|u| !u.trim().is_empty()) {
            config.lawyer_api_url = Some(url);
        }
        if let Some(secs) = var("SAFEGUARD_LOOKUP_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            config.lookup_timeout = Duration::from_secs(secs);
        }
        if let Some(url) = var("SAFEGUARD_QUEUE_API").filter(|u| !u.trim().is_empty()) {
            config.queue_api_url = Some(url);
        }
        if let Some(dir) = var("SAFEGUARD_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }

        config
    }

    /// Set the listening port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the remote lawyer directory.
    #[must_use]
    pub fn with_lawyer_api(mut self, url: impl Into<String>) -> Self {
        self.lawyer_api_url = Some(url.into());
        self
    }

    /// Set the lookup timeout.
    #[must_use]
    pub const fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Set the priority-queue service.
    #[must_use]
    pub fn with_queue_api(mut self, url: impl Into<String>) -> Self {
        self.queue_api_url = Some(url.into());
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "lookup_timeout must be > 0".to_string(),
            ));
        }

        if let Some(url) = &self.lawyer_api_url {
            Url::parse(url)?;
        }

        if let Some(url) = &self.queue_api_url {
            Url::parse(url)?;
        }

        Ok(())
    }
}

/// Parse a service base URL so relative endpoint paths join under it.
///
/// `http://host/svc` and `http://host/svc/` both become `http://host/svc/`.
pub(crate) fn service_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = SafeguardConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.lookup_timeout, Duration::from_secs(5));
        assert!(config.lawyer_api_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SafeguardConfig::new()
            .with_port(8080)
            .with_lawyer_api("http://lawyers.local")
            .with_lookup_timeout(Duration::from_secs(2));
        assert_eq!(config.port, 8080);
        assert_eq!(config.lawyer_api_url.as_deref(), Some("http://lawyers.local"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero = SafeguardConfig::new().with_lookup_timeout(Duration::ZERO);
        assert!(matches!(zero.validate(), Err(ConfigError::Invalid(_))));

        let bad_url = SafeguardConfig::new().with_queue_api("::nope::");
        assert!(matches!(bad_url.validate(), Err(ConfigError::Url(_))));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SAFEGUARD_PORT", "4000"),
            ("SAFEGUARD_LOOKUP_TIMEOUT_SECS", "9"),
            ("SAFEGUARD_LAWYER_API", "  "),
            ("SAFEGUARD_QUEUE_API", "http://queue.local"),
        ]);
        let config = SafeguardConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()));
        assert_eq!(config.port, 4000);
        assert_eq!(config.lookup_timeout, Duration::from_secs(9));
        assert!(config.lawyer_api_url.is_none());
        assert_eq!(config.queue_api_url.as_deref(), Some("http://queue.local"));
    }

    #[test]
    fn test_service_base_url_keeps_path_prefix() {
        let joined = |raw: &str| {
            service_base_url(raw)
                .and_then(|base| base.join("api/lawyers"))
                .map(|url| url.to_string())
                .unwrap_or_default()
        };
        assert_eq!(joined("http://host/svc"), "http://host/svc/api/lawyers");
        assert_eq!(joined("http://host/svc/"), "http://host/svc/api/lawyers");
        assert_eq!(joined("http://host"), "http://host/api/lawyers");
        assert!(service_base_url("::nope::").is_err());
    }

    #[test]
    fn test_duration_serialized_as_seconds() {
        let value = serde_json::to_value(SafeguardConfig::default()).unwrap_or_default();
        assert_eq!(value["lookup_timeout"], 5);
    }
}
