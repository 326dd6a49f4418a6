//! Application configuration resolved from the environment.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Environment variable naming the listen host.
pub const ENV_HOST: &str = "GREETER_HOST";

/// Environment variable naming the listen port.
pub const ENV_PORT: &str = "GREETER_PORT";

/// Environment variable selecting the runtime environment.
pub const ENV_ENVIRONMENT: &str = "GREETER_ENV";

/// Default listen host.
const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port.
const DEFAULT_PORT: u16 = 18080;

/// The runtime environment the process is deployed into.
///
/// Chiefly drives the log output format: human-readable in development,
/// JSON in production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development.
    Development,
    /// Production deployment.
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// Application configuration.
///
/// # Example
///
/// ```rust
/// use greeter_config::AppConfig;
///
/// let config = AppConfig::default();
/// assert_eq!(config.port, 18080);
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind the server to.
    pub host: String,

    /// Port to bind the server to.
    pub port: u16,

    /// Runtime environment.
    pub env: Environment,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            env: Environment::Development,
        }
    }
}

impl AppConfig {
    /// Resolves the configuration from the process environment.
    ///
    /// Unset variables fall back to defaults; set-but-malformed values
    /// are an error.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if [`ENV_PORT`] is not a valid port
    /// number or [`ENV_ENVIRONMENT`] names an unknown environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through an arbitrary variable lookup.
    ///
    /// [`from_env`](Self::from_env) passes the real process environment;
    /// tests can pass a closure over fixed values.
    ///
    /// # Errors
    ///
    /// Same conditions as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup(ENV_HOST) {
            config.host = host;
        }

        if let Some(port) = lookup(ENV_PORT) {
            config.port = port
                .parse()
                .map_err(|source| ConfigError::InvalidPort {
                    value: port,
                    source,
                })?;
        }

        if let Some(env) = lookup(ENV_ENVIRONMENT) {
            config.env = env.parse()?;
        }

        Ok(config)
    }
}
