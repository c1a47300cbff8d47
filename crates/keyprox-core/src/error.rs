use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProximityError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Native Decoder Error: {0}")]
    Decoder(String),
}

pub type KpResult<T> = Result<T, ProximityError>;
