use thiserror::Error;
use crate::models::Task;

/// Business rule violations. These are expected outcomes returned to the
/// caller, never panics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    // Carries the task as it is now when the caller wants to show it.
    #[error("{reason}")]
    InvalidState {
        reason: String,
        current: Option<Box<Task>>,
    },

    #[error("{0}")]
    InvalidTarget(String),

    #[error("You already have the maximum number of active loans ({0}).")]
    LoanLimitExceeded(usize),

    #[error("Email already exists.")]
    EmailTaken,

    #[error("Invalid email or password.")]
    InvalidCredentials,
}

impl EngineError {
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        EngineError::InvalidState { reason: reason.into(), current: None }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
