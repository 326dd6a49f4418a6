//! Configuration error types.

use thiserror::Error;

/// Error type for configuration resolution failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A port value could not be parsed as a number in `0..=65535`.
    #[error("invalid port '{value}'")]
    InvalidPort {
        /// The offending value.
        value: String,
        /// The underlying parse error.
        #[source]
        source: std::num::ParseIntError,
    },

    /// An environment name was not recognised.
    #[error("unknown environment '{0}', expected 'development' or 'production'")]
    UnknownEnvironment(String),
}
