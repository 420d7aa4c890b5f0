use thiserror::Error;

use crate::api::ApiError;
use crate::forms::FieldErrors;

/// Unified error type for the configuration, storage, and API layers.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl From<FieldErrors> for ClientError {
    fn from(errors: FieldErrors) -> Self {
        ClientError::Validation(errors)
    }
}
