use crate::config::ConfigError;
use crate::service::{ServiceError, SessionError};
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<SessionError> for FlowError {
    fn from(error: SessionError) -> Self {
        FlowError::Service(ServiceError::Session(error))
    }
}

impl From<anyhow::Error> for FlowError {
    fn from(error: anyhow::Error) -> Self {
        FlowError::Other(error)
    }
}

pub type FlowResult<T> = Result<T, FlowError>;
