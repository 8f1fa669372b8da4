//! Idempotency Store
//!
//! One durable outcome record per idempotency key, fronted by an atomic
//! reserve-or-get gate. The reservation is backed by the key's
//! uniqueness constraint enforced at write time; a plain
//! "exists? then act" sequence is a race and is deliberately impossible
//! through this interface.
//!
//! # Gate protocol
//!
//! 1. `reserve(key)` - exactly one concurrent caller wins `Reserved`
//!    (a PENDING placeholder lands under the key before any financial
//!    work); everyone else sees `InFlight` or `Resolved`.
//! 2. The winner does the work, then `finalize(key, record)` flips the
//!    placeholder to the resolved record with a CAS. Resolved records
//!    are never mutated again.
//! 3. A PENDING placeholder older than the configured stale threshold
//!    can be reclaimed by a later `reserve`, so a worker that died
//!    mid-flight does not poison its key. Reclaim is safe because the
//!    ledger commit itself is guarded by reference-id uniqueness.

pub mod db;
pub mod error;
pub mod memory;
pub mod record;
pub mod store;

pub use db::{PgIdempotencyStore, init_idempotency_schema};
pub use error::IdempotencyError;
pub use memory::MemoryIdempotencyStore;
pub use record::{IdempotencyRecord, OutcomeStatus};
pub use store::{IdempotencyStore, ReserveOutcome};
