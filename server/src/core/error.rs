use thiserror::Error;

/// Top-level server errors (startup and shutdown paths)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for server startup code
pub type Result<T> = std::result::Result<T, ServerError>;
