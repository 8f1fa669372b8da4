//! Consumer error types
//!
//! Business rejections never surface here - they resolve into recorded
//! outcomes inside the consumer. Only store-level unavailability
//! escapes, and it does so deliberately: the transport layer is
//! expected to redeliver, and the still-pending reservation will be
//! reclaimed once stale.

use thiserror::Error;

use crate::idempotency::IdempotencyError;
use crate::ledger::LedgerError;

#[derive(Error, Debug, Clone)]
pub enum ConsumerError {
    #[error("Ledger store failure: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Idempotency store failure: {0}")]
    Idempotency(#[from] IdempotencyError),
}
