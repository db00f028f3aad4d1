//! Client configuration.
//!
//! [`ClientConfig`] is an explicit value handed to
//! [`crate::client::RedocClient`] at construction time. The library never
//! consults the environment; binaries resolve `REDOC_API_KEY` /
//! `REDOC_API_URL` themselves and pass the results in here.

use crate::error::RedocError;
use std::fmt;

/// Conversion endpoint used when no base URL is configured.
pub const DEFAULT_API_URL: &str = "https://api.redoc.mx/cfdis/convert";

/// Whole-request deadline used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Credential and endpoint for the conversion service.
///
/// Built via [`ClientConfig::builder()`].
///
/// # Example
/// ```rust
/// use redoc_cfdi2pdf::ClientConfig;
///
/// let config = ClientConfig::builder("my-api-key")
///     .base_url("https://api.redoc.mx/cfdis/convert")
///     .timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.timeout_secs, 30);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Sent as `X-Redoc-Api-Key` on every request.
    pub api_key: String,

    /// Full URL of the conversion endpoint. Default: [`DEFAULT_API_URL`].
    pub base_url: String,

    /// Deadline for one request/response cycle in seconds. Default: 120.
    ///
    /// Covers connect, upload and the full body download. The service renders
    /// synchronously, so large CFDIs with long addendas may need more.
    pub timeout_secs: u64,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder(api_key: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: ClientConfig {
                api_key: api_key.into(),
                base_url: DEFAULT_API_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, RedocError> {
        let c = &self.config;
        if c.api_key.trim().is_empty() {
            return Err(RedocError::InvalidConfig(
                "API key must not be empty (set REDOC_API_KEY or pass one explicitly)".into(),
            ));
        }
        if !is_http_url(&c.base_url) {
            return Err(RedocError::InvalidConfig(format!(
                "Base URL must start with http:// or https://, got '{}'",
                c.base_url
            )));
        }
        if c.timeout_secs == 0 {
            return Err(RedocError::InvalidConfig("Timeout must be ≥ 1 second".into()));
        }
        Ok(self.config)
    }
}

fn is_http_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
