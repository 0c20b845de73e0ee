//! Error types for catalog-offline

use thiserror::Error;

use crate::worker::WorkerState;

pub type Result<T> = std::result::Result<T, OfflineError>;

#[derive(Error, Debug)]
pub enum OfflineError {
    #[error("Network error for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Failed to pre-cache {url}: {reason}")]
    Precache { url: String, reason: String },

    #[error("No network and no cached response for {0}")]
    Offline(String),

    #[error("Invalid asset URL {0}: {1}")]
    InvalidUrl(String, String),

    #[error("Worker is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: WorkerState,
        actual: WorkerState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
