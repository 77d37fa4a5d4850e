//! Client configuration

use crate::types::Timeouts;
use crate::{Result, VeritransError};
use std::env;
use std::time::Duration;

/// Sandbox API endpoint
pub const SANDBOX_API_HOST: &str = "https://api.sandbox.veritrans.co.id/v2";
/// Production API endpoint
pub const PRODUCTION_API_HOST: &str = "https://api.veritrans.co.id/v2";

/// Read-only settings shared by every call made through one client
#[derive(Clone)]
pub struct ClientConfig {
    /// Merchant server key used for Basic authentication
    pub server_key: Option<String>,
    /// Base URL of the API; only used to shorten URLs in logs and to build endpoint URLs
    pub api_host: String,
    /// Per-phase network timeouts
    pub timeouts: Timeouts,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_key", &self.server_key.as_ref().map(|_| "<redacted>"))
            .field("api_host", &self.api_host)
            .field("timeouts", &self.timeouts)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a sandbox config with the given server key
    pub fn new(server_key: impl Into<String>) -> Self {
        Self {
            server_key: Some(server_key.into()),
            ..Self::default()
        }
    }

    /// Create a production config with the given server key
    pub fn production(server_key: impl Into<String>) -> Self {
        Self::new(server_key).with_api_host(PRODUCTION_API_HOST)
    }

    /// Build a config from `VERITRANS_SERVER_KEY`, `VERITRANS_API_HOST` and
    /// `VERITRANS_PRODUCTION`
    pub fn from_env() -> Self {
        let mut config = Self {
            server_key: env::var("VERITRANS_SERVER_KEY").ok(),
            ..Self::default()
        };

        let production = env::var("VERITRANS_PRODUCTION")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        config = config.with_production(production);

        if let Ok(host) = env::var("VERITRANS_API_HOST") {
            if !host.is_empty() {
                config = config.with_api_host(host);
            }
        }

        config
    }

    /// Set the API host
    pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = api_host.into();
        self
    }

    /// Switch between the sandbox and production hosts
    pub fn with_production(self, production: bool) -> Self {
        if production {
            self.with_api_host(PRODUCTION_API_HOST)
        } else {
            self.with_api_host(SANDBOX_API_HOST)
        }
    }

    /// Set the per-phase timeouts
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Use one timeout for connect, write and read
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_timeouts(Timeouts::uniform(timeout))
    }

    /// Set the User-Agent header value
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Server key, or a configuration error when it is missing or empty
    pub fn server_key(&self) -> Result<&str> {
        match self.server_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(VeritransError::config(
                "Please add server_key to the Veritrans client config",
            )),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.server_key()?;
        Ok(())
    }

    /// Strip the API host from `url` for compact log labels
    pub fn short_url<'a>(&self, url: &'a str) -> std::borrow::Cow<'a, str> {
        if self.api_host.is_empty() {
            return std::borrow::Cow::Borrowed(url);
        }
        if url.contains(self.api_host.as_str()) {
            std::borrow::Cow::Owned(url.replacen(self.api_host.as_str(), "", 1))
        } else {
            std::borrow::Cow::Borrowed(url)
        }
    }

    /// Full URL for an endpoint path such as `/charge`
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_host.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_key: None,
            api_host: SANDBOX_API_HOST.to_string(),
            timeouts: Timeouts::default(),
            user_agent: format!("Veritrans rust crate {}", crate::VERSION),
        }
    }
}
