//! Ledger Error Types

use thiserror::Error;

/// Ledger store and executor errors
#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    // === Validation Errors ===
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Source and destination account cannot be the same")]
    SameAccount,

    // === Business Rejections ===
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Insufficient funds")]
    InsufficientFunds,

    // === Transient ===
    /// An account was concurrently modified since it was loaded. The
    /// executor never retries this itself; the consumer owns the retry
    /// policy.
    #[error("Optimistic version conflict")]
    VersionConflict,

    // === System Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Ledger store unavailable: {0}")]
    Unavailable(String),
}

impl LedgerError {
    /// Get the error code for recorded outcomes
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount => "INVALID_AMOUNT",
            LedgerError::SameAccount => "SAME_ACCOUNT",
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            LedgerError::VersionConflict => "VERSION_CONFLICT",
            LedgerError::Database(_) => "DATABASE_ERROR",
            LedgerError::Unavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Get HTTP-style status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            LedgerError::InvalidAmount | LedgerError::SameAccount => 400,
            LedgerError::AccountNotFound(_) => 404,
            LedgerError::InsufficientFunds => 422,
            LedgerError::VersionConflict => 409,
            LedgerError::Database(_) => 500,
            LedgerError::Unavailable(_) => 503,
        }
    }

    /// True for errors where no retry may move money blindly
    /// (store-level failures, as opposed to version conflicts)
    pub fn is_store_failure(&self) -> bool {
        matches!(self, LedgerError::Database(_) | LedgerError::Unavailable(_))
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                LedgerError::Unavailable(e.to_string())
            }
            other => LedgerError::Database(other.to_string()),
        }
    }
}
