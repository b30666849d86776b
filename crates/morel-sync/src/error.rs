//! Error types for morel-sync

use morel_core::ItemId;
use thiserror::Error;

/// Failure of a single store request.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The request never completed: connection refused, reset, timed out.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered and refused.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The store answered with a row we could not decode.
    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

impl From<morel_core::Error> for StoreError {
    fn from(err: morel_core::Error) -> Self {
        StoreError::InvalidRow(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Failure of a synchronizer operation.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A mutation named an id the local catalog does not hold.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// The underlying store request failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for morel-sync operations
pub type Result<T> = std::result::Result<T, SyncError>;
