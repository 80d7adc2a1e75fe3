//! Client configuration types.
//!
//! - [`ClientConfig`]: transport settings (timeouts, connection pool).
//! - [`TokenConfig`]: the API key and the header carrying it.

use std::fmt;
use std::time::Duration;

/// Header used for the API key when none is configured.
pub const DEFAULT_HEADER_KEY: &str = "X-Token";

/// Environment variable read by [`TokenConfig::from_env`] for the API key.
pub const API_KEY_ENV: &str = "CALENDLY_API_KEY";

/// Environment variable read by [`TokenConfig::from_env`] for the header name.
pub const HEADER_KEY_ENV: &str = "CALENDLY_HEADER_KEY";

// ============================================================================
// Credential
// ============================================================================

/// API key and the header name used to send it.
///
/// An empty API key is accepted here and rejected when a request is sent,
/// before anything reaches the network.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenConfig {
    api_key: String,
    header_key: String,
}

impl TokenConfig {
    /// Configuration for `api_key` sent in the default `X-Token` header.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            header_key: String::new(),
        }
    }

    /// Read `CALENDLY_API_KEY` and, optionally, `CALENDLY_HEADER_KEY`.
    ///
    /// Unset variables leave the matching field empty.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).unwrap_or_default(),
            header_key: std::env::var(HEADER_KEY_ENV).unwrap_or_default(),
        }
    }

    /// Send the key in `header_key` instead of `X-Token`.
    #[must_use]
    pub fn with_header_key(mut self, header_key: impl Into<String>) -> Self {
        self.header_key = header_key.into();
        self
    }

    /// The API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The header carrying the key, `X-Token` when unset.
    #[must_use]
    pub fn header_key(&self) -> &str {
        if self.header_key.is_empty() {
            DEFAULT_HEADER_KEY
        } else {
            &self.header_key
        }
    }

    /// Store the default header name if none is set.
    pub(crate) fn resolve_header_key(mut self) -> Self {
        if self.header_key.is_empty() {
            self.header_key = DEFAULT_HEADER_KEY.to_owned();
        }
        self
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .field("header_key", &self.header_key)
            .finish()
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout duration, covering send and body collection.
    pub timeout: Duration,
    /// Connection timeout duration.
    pub connect_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_idle_per_host: usize,
    /// Idle connection timeout.
    pub pool_idle_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    pool_idle_per_host: Option<usize>,
    pool_idle_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Set the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.pool_idle_per_host = Some(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = Some(timeout);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            pool_idle_per_host: self
                .pool_idle_per_host
                .unwrap_or(defaults.pool_idle_per_host),
            pool_idle_timeout: self.pool_idle_timeout.unwrap_or(defaults.pool_idle_timeout),
        }
    }
}
