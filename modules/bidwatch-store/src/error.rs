use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    NotFound(i64),

    #[error("Item has no id")]
    MissingId,

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Legacy record {index} is invalid: {reason}")]
    LegacyRecord { index: usize, reason: String },

    #[error("Store data is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}
