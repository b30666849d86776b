//! Error types for morel-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// A wire row could not be converted into a domain item.
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// A label did not match any variant of a fixed enumeration.
    #[error("Unknown label: {0}")]
    UnknownLabel(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
