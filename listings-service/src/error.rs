//! Infrastructure errors
//!
//! [`Error`] covers what can go wrong outside a request: loading
//! configuration, I/O, installing the tracing subscriber. Request-level
//! problems are [`Failure`] values produced by the executor instead.

use thiserror::Error;

use crate::failure::{Failure, FailureKind};

/// Result type for infrastructure operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration loaded but violates a limit
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Surface an infrastructure error as a server failure
///
/// The message is the generic server message; the error itself is kept as
/// the cause.
impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure::of(FailureKind::Server).with_cause(anyhow::Error::new(err))
    }
}
