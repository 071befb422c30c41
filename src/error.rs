use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("helpdesk responded with {status}: {body}")]
    HelpdeskApi { status: u16, body: String },
    #[error("completion request failed: {0}")]
    CompletionRequest(String),
    #[error("network error: {0}")]
    Network(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
