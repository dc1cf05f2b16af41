use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid ride count: expected a positive number, got {0}")]
    InvalidRideCount(i64),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Missing required columns: {columns:?}")]
    MissingColumns { columns: Vec<String> },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
