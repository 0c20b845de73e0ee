use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown status filter: {0}")]
    UnknownFilter(String),

    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Invalid catalog payload: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
