//! Ledger data models
//!
//! Accounts, transaction headers and journal legs. Amounts are exact
//! decimals (`rust_decimal`) end to end; floats never touch money.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account identifier (UUID on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh random account id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Generated transaction id
///
/// Using ULID provides:
/// - Monotonic, sortable IDs
/// - No coordination needed (no machine_id)
/// - 128-bit with good entropy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(ulid::Ulid);

impl TransactionId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// Generated journal leg id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JournalId(ulid::Ulid);

impl JournalId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }
}

impl Default for JournalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JournalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JournalId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// A funds-holding account
///
/// `version` is the optimistic-concurrency counter: every successful
/// mutation advances it by one, and every balance write is conditioned
/// on it. The balance is never written outside the version check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    /// Unique human-facing number, e.g. "ACC-10001"
    pub account_number: String,
    pub owner_name: String,
    pub balance: Decimal,
    /// ISO 4217 code, e.g. "USD"
    pub currency: String,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        id: AccountId,
        account_number: impl Into<String>,
        owner_name: impl Into<String>,
        balance: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id,
            account_number: account_number.into(),
            owner_name: owner_name.into(),
            balance,
            currency: currency.into(),
            version: 0,
            created_at: Utc::now(),
        }
    }
}

/// Immutable transaction header, one per applied transfer
///
/// `reference_id` carries the caller's idempotency key and is unique,
/// which is what makes re-applying a committed transfer impossible.
#[derive(Debug, Clone)]
pub struct TransactionHeader {
    pub id: TransactionId,
    /// Description of the movement, e.g. "Transfer"
    pub kind: String,
    pub reference_id: String,
    pub created_at: DateTime<Utc>,
}

impl TransactionHeader {
    pub fn new(kind: impl Into<String>, reference_id: impl Into<String>) -> Self {
        Self {
            id: TransactionId::new(),
            kind: kind.into(),
            reference_id: reference_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// One signed journal leg. For every header the legs sum to zero.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub id: JournalId,
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub amount: Decimal,
}

impl JournalEntry {
    pub fn new(transaction_id: TransactionId, account_id: AccountId, amount: Decimal) -> Self {
        Self {
            id: JournalId::new(),
            transaction_id,
            account_id,
            amount,
        }
    }
}

/// Version-conditioned balance write, applied only if the account's
/// current version equals `expected_version`.
#[derive(Debug, Clone)]
pub struct BalanceUpdate {
    pub account_id: AccountId,
    pub expected_version: i64,
    pub new_balance: Decimal,
}

/// Result of committing a transfer unit against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Header, legs and balance updates are all visible
    Applied,
    /// A transfer with this reference id was already committed; nothing
    /// was written
    AlreadyApplied,
}

/// Outcome of a successfully applied (or replayed) transfer
#[derive(Debug, Clone)]
pub struct TransferApplied {
    pub transaction_id: TransactionId,
    pub source_balance: Decimal,
    pub destination_balance: Decimal,
    /// True when the reference id was already committed by an earlier
    /// attempt and no new mutation happened
    pub replayed: bool,
}
