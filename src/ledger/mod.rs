//! Double-Entry Ledger
//!
//! Durable holder of accounts, transaction headers and journal legs,
//! plus the Transfer Executor that applies a validated transfer as one
//! atomic unit.
//!
//! # Safety Invariants
//!
//! 1. **Version-checked writes**: balances are only ever written through
//!    a compare-and-update on the account version, never read-modify-write
//! 2. **Zero-sum legs**: every committed header carries exactly two legs
//!    whose signed amounts sum to zero
//! 3. **Reference uniqueness**: a committed `reference_id` can never be
//!    applied a second time

pub mod db;
pub mod error;
pub mod executor;
pub mod memory;
pub mod models;
pub mod store;

pub use db::{PgLedgerStore, init_ledger_schema};
pub use error::LedgerError;
pub use executor::TransferExecutor;
pub use memory::MemoryLedgerStore;
pub use models::{
    Account, AccountId, BalanceUpdate, CommitOutcome, JournalEntry, JournalId, TransactionHeader,
    TransactionId, TransferApplied,
};
pub use store::LedgerStore;
