//! Transfer Executor
//!
//! Applies one validated transfer as a single atomic unit against the
//! Ledger Store: header, two zero-sum journal legs and two
//! version-conditioned balance updates. Exactly one attempt per call;
//! `VersionConflict` is surfaced to the caller, which owns the retry
//! policy. No side effects beyond the store, no network calls.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

use super::error::LedgerError;
use super::models::{
    AccountId, BalanceUpdate, CommitOutcome, JournalEntry, TransactionHeader, TransferApplied,
};
use super::store::LedgerStore;

pub struct TransferExecutor {
    store: Arc<dyn LedgerStore>,
}

impl TransferExecutor {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    /// Execute a transfer of `amount` from `source` to `destination`,
    /// recorded under `reference_id`.
    ///
    /// Preconditions: amount > 0, source != destination. On
    /// `InsufficientFunds` nothing is mutated. A `reference_id` that was
    /// already committed replays as success with freshly read balances.
    pub async fn execute(
        &self,
        source: AccountId,
        destination: AccountId,
        amount: Decimal,
        reference_id: &str,
    ) -> Result<TransferApplied, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        if source == destination {
            return Err(LedgerError::SameAccount);
        }

        let from = self
            .store
            .get_account(source)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(source.to_string()))?;
        let to = self
            .store
            .get_account(destination)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(destination.to_string()))?;

        if from.balance < amount {
            // The reference may already be committed (redelivery after a
            // crash) with the source since drained below the amount. The
            // recorded outcome must replay success, not a rejection.
            if let Some(committed) = self.store.transaction_by_reference(reference_id).await? {
                debug!(
                    transaction_id = %committed.id,
                    reference_id = reference_id,
                    "Transfer already committed - replaying despite drained source"
                );
                return Ok(TransferApplied {
                    transaction_id: committed.id,
                    source_balance: from.balance,
                    destination_balance: to.balance,
                    replayed: true,
                });
            }
            return Err(LedgerError::InsufficientFunds);
        }

        let header = TransactionHeader::new("Transfer", reference_id);
        let legs = [
            JournalEntry::new(header.id, source, -amount),
            JournalEntry::new(header.id, destination, amount),
        ];
        let updates = [
            BalanceUpdate {
                account_id: source,
                expected_version: from.version,
                new_balance: from.balance - amount,
            },
            BalanceUpdate {
                account_id: destination,
                expected_version: to.version,
                new_balance: to.balance + amount,
            },
        ];

        match self.store.commit_transfer(&header, &legs, &updates).await? {
            CommitOutcome::Applied => {
                debug!(
                    transaction_id = %header.id,
                    reference_id = reference_id,
                    %amount,
                    "Transfer applied"
                );
                Ok(TransferApplied {
                    transaction_id: header.id,
                    source_balance: updates[0].new_balance,
                    destination_balance: updates[1].new_balance,
                    replayed: false,
                })
            }
            CommitOutcome::AlreadyApplied => {
                // A previous attempt committed this reference (consumer
                // crashed between execute and record). Report success
                // against the balances as they stand now.
                let committed = self
                    .store
                    .transaction_by_reference(reference_id)
                    .await?
                    .ok_or_else(|| {
                        LedgerError::Database(format!(
                            "reference {reference_id} reported committed but header missing"
                        ))
                    })?;
                let from_now = self
                    .store
                    .get_account(source)
                    .await?
                    .ok_or_else(|| LedgerError::AccountNotFound(source.to_string()))?;
                let to_now = self
                    .store
                    .get_account(destination)
                    .await?
                    .ok_or_else(|| LedgerError::AccountNotFound(destination.to_string()))?;

                debug!(
                    transaction_id = %committed.id,
                    reference_id = reference_id,
                    "Transfer already committed - replaying result"
                );
                Ok(TransferApplied {
                    transaction_id: committed.id,
                    source_balance: from_now.balance,
                    destination_balance: to_now.balance,
                    replayed: true,
                })
            }
        }
    }
}
