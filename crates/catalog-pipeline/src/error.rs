//! Error types for catalog-pipeline

use std::time::Duration;

use catalog_core::CoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error(transparent)]
    Parse(#[from] CoreError),
}

/// Coarse failure class. All classes lead to the same error view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Protocol,
    Parse,
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Timeout(_) | FetchError::Network(_) => FailureKind::Network,
            FetchError::Status(_) => FailureKind::Protocol,
            FetchError::Parse(_) => FailureKind::Parse,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}
