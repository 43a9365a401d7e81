//! Error types for ambient-ctl
//!
//! The controller itself is infallible; errors come from configuration,
//! scenario files and the service channel.

use thiserror::Error;

/// Main error type for ambient-ctl
#[derive(Error, Debug)]
pub enum Error {
    /// Shared errors (configuration, curve definitions)
    #[error(transparent)]
    Common(#[from] ambient_common::Error),

    /// Scenario file loading or parsing errors
    #[error("Scenario error: {0}")]
    Scenario(String),

    /// The service task has stopped and no longer accepts commands
    #[error("Ambient service is no longer running")]
    ServiceClosed,

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using ambient-ctl Error
pub type Result<T> = std::result::Result<T, Error>;
