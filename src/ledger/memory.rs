//! In-memory Ledger Store
//!
//! Mutex-protected tables with the same commit semantics as the
//! Postgres store. Backs the test suite and the demo binary; a process
//! restart loses it, so production deployments configure Postgres.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::LedgerError;
use super::models::{
    Account, AccountId, BalanceUpdate, CommitOutcome, JournalEntry, TransactionHeader,
    TransactionId,
};
use super::store::LedgerStore;

#[derive(Default)]
struct LedgerTables {
    accounts: HashMap<AccountId, Account>,
    transactions: HashMap<TransactionId, TransactionHeader>,
    /// reference_id -> transaction id, the uniqueness constraint
    by_reference: HashMap<String, TransactionId>,
    journal: Vec<JournalEntry>,
}

/// In-memory implementation of [`LedgerStore`]
#[derive(Default)]
pub struct MemoryLedgerStore {
    tables: Mutex<LedgerTables>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed transactions (test/diagnostic surface)
    pub fn transaction_count(&self) -> usize {
        self.tables.lock().unwrap().transactions.len()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.accounts.get(&id).cloned())
    }

    async fn insert_account(&self, account: &Account) -> Result<(), LedgerError> {
        let mut tables = self.tables.lock().unwrap();
        tables.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn commit_transfer(
        &self,
        header: &TransactionHeader,
        legs: &[JournalEntry; 2],
        updates: &[BalanceUpdate; 2],
    ) -> Result<CommitOutcome, LedgerError> {
        let mut tables = self.tables.lock().unwrap();

        // Uniqueness constraint on reference_id: an already-committed
        // transfer is never re-applied.
        if tables.by_reference.contains_key(&header.reference_id) {
            return Ok(CommitOutcome::AlreadyApplied);
        }

        // Validate both version preconditions before touching anything,
        // so a conflict leaves the unit unapplied.
        for update in updates {
            let account = tables
                .accounts
                .get(&update.account_id)
                .ok_or_else(|| LedgerError::AccountNotFound(update.account_id.to_string()))?;
            if account.version != update.expected_version {
                return Err(LedgerError::VersionConflict);
            }
        }

        tables
            .by_reference
            .insert(header.reference_id.clone(), header.id);
        tables.transactions.insert(header.id, header.clone());
        tables.journal.extend(legs.iter().cloned());

        for update in updates {
            let account = tables
                .accounts
                .get_mut(&update.account_id)
                .expect("checked above");
            account.balance = update.new_balance;
            account.version += 1;
        }

        Ok(CommitOutcome::Applied)
    }

    async fn journal_for_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .journal
            .iter()
            .filter(|leg| leg.transaction_id == transaction_id)
            .cloned()
            .collect())
    }

    async fn transaction_by_reference(
        &self,
        reference_id: &str,
    ) -> Result<Option<TransactionHeader>, LedgerError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .by_reference
            .get(reference_id)
            .and_then(|id| tables.transactions.get(id))
            .cloned())
    }
}
