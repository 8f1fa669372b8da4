//! Ledger Store seam
//!
//! The durable holder of accounts, transaction headers and journal legs.
//! Implementations must make `commit_transfer` a single atomic unit:
//! either the header, both legs and both balance updates are visible
//! together, or nothing is.

use async_trait::async_trait;

use super::error::LedgerError;
use super::models::{
    Account, AccountId, BalanceUpdate, CommitOutcome, JournalEntry, TransactionHeader,
    TransactionId,
};

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Load an account by id
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, LedgerError>;

    /// Insert a newly provisioned account
    ///
    /// Provisioning happens outside the processing core; this is the
    /// primitive the seeding and test layers use.
    async fn insert_account(&self, account: &Account) -> Result<(), LedgerError>;

    /// Commit one transfer as an atomic unit
    ///
    /// Each balance update is conditioned on the account's version; any
    /// mismatch fails the whole unit with `VersionConflict` and writes
    /// nothing. A duplicate `reference_id` on the header yields
    /// `AlreadyApplied` without mutation, so a consumer re-driving a
    /// transfer after a crash can never apply it twice.
    async fn commit_transfer(
        &self,
        header: &TransactionHeader,
        legs: &[JournalEntry; 2],
        updates: &[BalanceUpdate; 2],
    ) -> Result<CommitOutcome, LedgerError>;

    /// Fetch the journal legs of one transaction (audit/history surface)
    async fn journal_for_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Vec<JournalEntry>, LedgerError>;

    /// Look up a committed transaction by its reference id
    async fn transaction_by_reference(
        &self,
        reference_id: &str,
    ) -> Result<Option<TransactionHeader>, LedgerError>;
}
