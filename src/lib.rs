//! ledger-core - Idempotent Transfer Processing Core
//!
//! Moves funds between accounts in response to asynchronously delivered
//! transfer intents, applying each intent financially at most once even
//! under redelivery, with every applied transfer leaving the ledger
//! double-entry consistent.
//!
//! # Modules
//!
//! - [`ledger`] - accounts, transaction headers, journal legs and the
//!   atomic Transfer Executor (Postgres and in-memory stores)
//! - [`idempotency`] - one durable outcome record per key behind an
//!   atomic reserve-or-get gate
//! - [`risk`] - risk screen capability interface (fail-open at the
//!   consumer call site)
//! - [`intent`] - queue-side consumer state machine and worker pool
//! - [`notify`] - best-effort outcome publication
//! - [`config`] / [`logging`] - process wiring

pub mod config;
pub mod idempotency;
pub mod intent;
pub mod ledger;
pub mod logging;
pub mod notify;
pub mod risk;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use idempotency::{
    IdempotencyError, IdempotencyRecord, IdempotencyStore, MemoryIdempotencyStore, OutcomeStatus,
    PgIdempotencyStore, ReserveOutcome,
};
pub use intent::{
    ConsumerConfig, ConsumerError, IntentConsumer, IntentEnvelope, IntentState, TransferIntent,
    WorkerPool, intent_channel,
};
pub use ledger::{
    Account, AccountId, LedgerError, LedgerStore, MemoryLedgerStore, PgLedgerStore,
    TransferExecutor,
};
pub use notify::{BroadcastNotifier, NoopNotifier, NotifyStatus, OutcomeNotifier, OutcomeUpdate};
pub use risk::{AlwaysSafe, RiskScreen, ThresholdScreen, Verdict};
