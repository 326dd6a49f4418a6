//! Server configuration types.
//!
//! Configuration is passed explicitly into the server; defaults live here
//! and are never hardcoded inside the serving loop itself.
//!
//! # Example
//!
//! ```rust
//! use greeter_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .host("127.0.0.1")
//!     .port(8080)
//!     .shutdown_timeout(Duration::from_secs(30))
//!     .build();
//!
//! assert_eq!(config.listen_addr(), "127.0.0.1:8080");
//! ```

use std::time::Duration;

/// Default listen host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 18080;

/// Server configuration.
///
/// Use [`ServerConfig::builder()`] to construct instances.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind the listener to.
    host: String,

    /// Port to bind the listener to.
    port: u16,

    /// How long to wait for in-flight connections during shutdown.
    ///
    /// `None` waits indefinitely.
    shutdown_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Creates a new server configuration builder.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Returns the listen host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the listen port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the full listen address as a `host:port` string.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the graceful shutdown timeout, if one is configured.
    ///
    /// `None` means the server waits indefinitely for in-flight
    /// connections to drain.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Option<Duration> {
        self.shutdown_timeout
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    host: String,
    port: u16,
    shutdown_timeout: Option<Duration>,
}

impl ServerConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            shutdown_timeout: None,
        }
    }

    /// Sets the host to bind to (e.g., `"0.0.0.0"`, `"127.0.0.1"`).
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port to bind to.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Bounds the graceful shutdown wait.
    ///
    /// Without this, shutdown waits indefinitely for in-flight
    /// connections to complete.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            shutdown_timeout: self.shutdown_timeout,
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host(), DEFAULT_HOST);
        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.shutdown_timeout(), None);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ServerConfig::builder()
            .host("127.0.0.1")
            .port(9090)
            .shutdown_timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 9090);
        assert_eq!(config.shutdown_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_listen_addr_format() {
        let config = ServerConfig::builder().host("localhost").port(80).build();
        assert_eq!(config.listen_addr(), "localhost:80");
    }
}
