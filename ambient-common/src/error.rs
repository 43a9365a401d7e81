//! Common error types for the ambient zone audio crates

use thiserror::Error;

/// Common result type for ambient operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the controller library and its hosts
///
/// The cross-fade state machine itself never fails; these errors only
/// surface while loading configuration or talking to the outside world.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or parsing error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input (bad curve name, malformed keyframes, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::Config(format!("Failed to parse TOML: {}", error))
    }
}
