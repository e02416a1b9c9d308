//! Error types for macpass

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Network Errors
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    // Directory Errors
    #[error("Authentication failed: {0}")]
    Auth(String),

    // Input Errors
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Failure class reported in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Connection(_) | Error::Timeout(_) => "ConnectionError",
            Error::Auth(_) => "AuthError",
            Error::Validation(_) => "ValidationError",
            Error::Config(_) => "ConfigError",
            Error::Serialization(_) => "SerializationError",
            Error::Io(_) => "IOError",
        }
    }

    /// True for unreachable peers, including timeouts
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(_) | Error::Timeout(_))
    }
}

/// Await `fut` for at most `limit`. `what` names the operation in the
/// resulting [`Error::Timeout`].
pub async fn with_timeout<F: Future>(limit: Duration, what: &str, fut: F) -> Result<F::Output> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| Error::Timeout(format!("{} exceeded {:?}", what, limit)))
}
