//! In-memory Idempotency Store
//!
//! DashMap-backed. The per-key `entry` API gives the same atomicity the
//! Postgres store gets from its primary-key constraint: only one caller
//! can materialize the PENDING slot for a key.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::error::IdempotencyError;
use super::record::IdempotencyRecord;
use super::store::{IdempotencyStore, ReserveOutcome};

enum Slot {
    Pending { reserved_at: Instant },
    Resolved(IdempotencyRecord),
}

/// In-memory implementation of [`IdempotencyStore`]
#[derive(Default)]
pub struct MemoryIdempotencyStore {
    slots: DashMap<String, Slot>,
}

impl MemoryIdempotencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resolved keys (test/diagnostic surface)
    pub fn resolved_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|e| matches!(e.value(), Slot::Resolved(_)))
            .count()
    }
}

#[async_trait]
impl IdempotencyStore for MemoryIdempotencyStore {
    async fn reserve(
        &self,
        key: &str,
        stale_after: Duration,
    ) -> Result<ReserveOutcome, IdempotencyError> {
        match self.slots.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(Slot::Pending {
                    reserved_at: Instant::now(),
                });
                Ok(ReserveOutcome::Reserved)
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Slot::Pending { reserved_at } => {
                    if reserved_at.elapsed() >= stale_after {
                        // Take over the dead worker's reservation
                        *reserved_at = Instant::now();
                        Ok(ReserveOutcome::Reserved)
                    } else {
                        Ok(ReserveOutcome::InFlight)
                    }
                }
                Slot::Resolved(record) => Ok(ReserveOutcome::Resolved(record.clone())),
            },
        }
    }

    async fn finalize(
        &self,
        key: &str,
        record: IdempotencyRecord,
    ) -> Result<bool, IdempotencyError> {
        match self.slots.get_mut(key) {
            Some(mut slot) => {
                if matches!(slot.value(), Slot::Pending { .. }) {
                    *slot.value_mut() = Slot::Resolved(record);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            // No reservation to flip, same as the Postgres store where
            // no PENDING row exists to update
            None => Ok(false),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<IdempotencyRecord>, IdempotencyError> {
        Ok(self.slots.get(key).and_then(|slot| match slot.value() {
            Slot::Resolved(record) => Some(record.clone()),
            Slot::Pending { .. } => None,
        }))
    }
}
