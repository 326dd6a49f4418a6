//! # Greeter Config
//!
//! Process-level configuration for the greeter server, resolved from
//! environment variables over built-in defaults.
//!
//! The server core takes its settings explicitly; this crate is where
//! they come from in a running process. Values are read once at startup,
//! and a malformed value fails fast before the server ever binds.
//!
//! ## Example
//!
//! ```rust
//! use greeter_config::AppConfig;
//!
//! # fn main() -> Result<(), greeter_config::ConfigError> {
//! let config = AppConfig::from_env()?;
//! println!("listening on {}:{}", config.host, config.port);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;

pub use config::{AppConfig, Environment, ENV_ENVIRONMENT, ENV_HOST, ENV_PORT};
pub use error::ConfigError;
