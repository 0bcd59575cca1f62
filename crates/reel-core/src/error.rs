use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReelError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid rating {0}, expected 1-10")]
    InvalidRating(u8),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
