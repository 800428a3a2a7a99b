//! Gateway configuration supplied by the embedding application

use crate::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// PayPal sandbox NVP endpoint
pub const DEFAULT_SERVER_URL: &str = "https://api-3t.sandbox.paypal.com/nvp";

/// NVP API version sent with every call
pub const DEFAULT_LIB_VERSION: &str = "78.0";

/// Consecutive transport failures before the service reports itself down
pub const DEFAULT_FAILURE_REPORTING_THRESHOLD: u32 = 5;

/// API credentials sent as the leading fields of every request
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    pub signature: String,
}

impl Credentials {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            signature: signature.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("signature", &"<redacted>")
            .finish()
    }
}

/// Configuration for the PayPal payment service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayPalConfig {
    pub credentials: Credentials,
    /// NVP protocol version
    #[serde(default = "default_lib_version")]
    pub lib_version: String,
    /// Target NVP endpoint
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_failure_reporting_threshold")]
    pub failure_reporting_threshold: u32,
    /// Request timeout in milliseconds; the HTTP client default applies when unset
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Accept a response body whose final value lacks the trailing `&`
    ///
    /// Live PayPal endpoints usually end the body without a trailing `&`, so
    /// production deployments will want this enabled.
    #[serde(default)]
    pub lenient_parsing: bool,
}

fn default_lib_version() -> String {
    DEFAULT_LIB_VERSION.to_string()
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_failure_reporting_threshold() -> u32 {
    DEFAULT_FAILURE_REPORTING_THRESHOLD
}

impl PayPalConfig {
    /// Create a new config for the given endpoint
    pub fn new(server_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            credentials,
            lib_version: default_lib_version(),
            server_url: server_url.into(),
            failure_reporting_threshold: DEFAULT_FAILURE_REPORTING_THRESHOLD,
            timeout_ms: None,
            lenient_parsing: false,
        }
    }

    /// Set the NVP protocol version
    pub fn with_lib_version(mut self, lib_version: impl Into<String>) -> Self {
        self.lib_version = lib_version.into();
        self
    }

    /// Set the failure reporting threshold
    pub fn with_failure_reporting_threshold(mut self, threshold: u32) -> Self {
        self.failure_reporting_threshold = threshold;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Enable or disable lenient response parsing
    pub fn with_lenient_parsing(mut self, lenient: bool) -> Self {
        self.lenient_parsing = lenient;
        self
    }

    /// Request timeout, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PaymentError::config(format!("Failed to read config file: {}", e)))?;

        let config: PayPalConfig = serde_json::from_str(&content)
            .map_err(|e| PaymentError::config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let credentials = Credentials::new(
            std::env::var("PAYPAL_USER").unwrap_or_default(),
            std::env::var("PAYPAL_PASSWORD").unwrap_or_default(),
            std::env::var("PAYPAL_SIGNATURE").unwrap_or_default(),
        );
        let mut config = Self::new(DEFAULT_SERVER_URL, credentials);

        if let Ok(server_url) = std::env::var("PAYPAL_SERVER_URL") {
            config.server_url = server_url;
        }

        if let Ok(lib_version) = std::env::var("PAYPAL_VERSION") {
            config.lib_version = lib_version;
        }

        if let Ok(threshold) = std::env::var("PAYPAL_FAILURE_THRESHOLD") {
            config.failure_reporting_threshold = threshold.parse().map_err(|e| {
                PaymentError::config(format!("Invalid PAYPAL_FAILURE_THRESHOLD: {}", e))
            })?;
        }

        if let Ok(timeout) = std::env::var("PAYPAL_TIMEOUT_MS") {
            config.timeout_ms = Some(timeout.parse().map_err(|e| {
                PaymentError::config(format!("Invalid PAYPAL_TIMEOUT_MS: {}", e))
            })?);
        }

        if let Ok(lenient) = std::env::var("PAYPAL_LENIENT_PARSING") {
            config.lenient_parsing = lenient.parse().map_err(|e| {
                PaymentError::config(format!("Invalid PAYPAL_LENIENT_PARSING: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.credentials.user.is_empty() {
            return Err(PaymentError::config("PAYPAL_USER is required"));
        }

        if self.credentials.password.is_empty() {
            return Err(PaymentError::config("PAYPAL_PASSWORD is required"));
        }

        if self.credentials.signature.is_empty() {
            return Err(PaymentError::config("PAYPAL_SIGNATURE is required"));
        }

        if self.lib_version.is_empty() {
            return Err(PaymentError::config("NVP version cannot be empty"));
        }

        if self.timeout_ms == Some(0) {
            return Err(PaymentError::config("Request timeout must be at least 1ms"));
        }

        let url = url::Url::parse(&self.server_url)
            .map_err(|e| PaymentError::config(format!("Invalid server URL: {}", e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(PaymentError::config(
                "Server URL must start with http:// or https://",
            ));
        }

        Ok(())
    }
}
