//! Error types for morel-server

use thiserror::Error;

/// Server error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// Filesystem or socket failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The item database failed.
    #[error("Store error: {0}")]
    Store(#[from] morel_store::Error),

    /// The HTTP layer failed.
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    /// The configured bind address did not parse.
    #[error("Invalid bind address: {0}")]
    Addr(#[from] std::net::AddrParseError),
}

/// Result type alias for morel-server operations
pub type Result<T> = std::result::Result<T, Error>;
