//! Idempotency Store error types

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum IdempotencyError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Idempotency store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt idempotency record for key {key}: {detail}")]
    Corrupt { key: String, detail: String },
}

impl From<sqlx::Error> for IdempotencyError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                IdempotencyError::Unavailable(e.to_string())
            }
            other => IdempotencyError::Database(other.to_string()),
        }
    }
}
