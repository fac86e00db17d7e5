use crate::{config::ConfigError, service::api::ApiError};

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("{0}")]
    InputValidation(String),

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(ApiError),

    #[error("Backend rejected the request: {0}")]
    BackendRejected(ApiError),

    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Dialogue state error: {0}")]
    DialogueStateError(String),

    #[error(transparent)]
    Other(anyhow::Error),
}

impl BotError {
    pub fn invalid(message: impl Into<String>) -> Self {
        BotError::InputValidation(message.into())
    }

    /// Errors that end the running flow. Validation and authorization errors
    /// leave the dialogue where it was.
    pub fn resets_flow(&self) -> bool {
        !matches!(self, BotError::InputValidation(_) | BotError::Authorization(_))
    }
}

impl From<ApiError> for BotError {
    fn from(error: ApiError) -> Self {
        if error.is_unavailable() {
            BotError::BackendUnavailable(error)
        } else {
            BotError::BackendRejected(error)
        }
    }
}

impl From<anyhow::Error> for BotError {
    fn from(error: anyhow::Error) -> Self {
        BotError::Other(error)
    }
}

pub type HandlerResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub type BotResult<T> = Result<T, BotError>;
