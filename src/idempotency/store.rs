//! Idempotency Store seam

use async_trait::async_trait;
use std::time::Duration;

use super::error::IdempotencyError;
use super::record::IdempotencyRecord;

/// Outcome of the atomic reserve-or-get gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// This caller won the key and must process the intent
    Reserved,
    /// Another worker currently holds a live reservation for the key
    InFlight,
    /// The key was already resolved; replay the stored outcome
    Resolved(IdempotencyRecord),
}

#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    /// Atomically reserve a key or fetch its state
    ///
    /// Exactly one concurrent caller observes `Reserved` for a given key.
    /// A PENDING reservation older than `stale_after` is taken over by
    /// the caller (single CAS), which is how crashed workers are
    /// recovered from.
    async fn reserve(
        &self,
        key: &str,
        stale_after: Duration,
    ) -> Result<ReserveOutcome, IdempotencyError>;

    /// Flip a PENDING reservation to its resolved record
    ///
    /// CAS-guarded: returns false (and writes nothing) when the key is
    /// already resolved, so duplicate finalization attempts are harmless.
    async fn finalize(
        &self,
        key: &str,
        record: IdempotencyRecord,
    ) -> Result<bool, IdempotencyError>;

    /// Read the resolved record for a key, if any
    async fn get(&self, key: &str) -> Result<Option<IdempotencyRecord>, IdempotencyError>;
}
