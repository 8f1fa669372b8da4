//! Intent Processing Pipeline
//!
//! Consumes transfer intents from the queue and drives each one through
//! the idempotency gate, the risk screen and the transfer executor,
//! recording and publishing the outcome.
//!
//! # State Machine
//!
//! ```text
//! RECEIVED → GATED → {DUPLICATE, SCREENING} → {BLOCKED, EXECUTING}
//!          → {SUCCEEDED, INSUFFICIENT_FUNDS, FAILED} → RECORDED
//! ```
//!
//! # Safety Invariants
//!
//! 1. **Reserve before work**: no financial call happens before the
//!    uniqueness-backed reservation is won
//! 2. **Fail-open screening**: an unreachable risk screen passes the
//!    intent, it never blocks it
//! 3. **Bounded conflict retry**: version conflicts retry here with
//!    backoff; the executor itself never retries
//! 4. **Record before notify**: notifications are best-effort and fire
//!    only after the outcome is durable

pub mod channel;
pub mod consumer;
pub mod error;
pub mod state;
pub mod types;
pub mod worker;


pub use channel::{IntentReceiver, IntentSender, intent_channel};
pub use consumer::{ConsumerConfig, IntentConsumer};
pub use error::ConsumerError;
pub use state::IntentState;
pub use types::{IntentData, IntentEnvelope, TransferIntent};
pub use worker::WorkerPool;
