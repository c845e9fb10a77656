// Application error type plus the business-rule taxonomy it wraps.
use thiserror::Error;

pub mod response;
pub mod engine;

// Re-export commonly used types
pub use engine::{EngineError, EngineResult};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

// Custom result type
pub type AppResult<T> = Result<T, AppError>;
