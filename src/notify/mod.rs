//! Outcome Notifier
//!
//! Best-effort publish of processing results to per-account channels.
//! Strictly outside the consistency boundary: a failed or slow delivery
//! never blocks or rolls back a committed ledger outcome.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::ledger::AccountId;

/// Wire status of an outcome notification
///
/// A risk block is published as `FRAUD` even though the stored record
/// says `BLOCKED_BY_RISK`; the notification channel predates the store
/// vocabulary and clients key off these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotifyStatus {
    Success,
    Fraud,
    InsufficientFunds,
    Error,
}

/// One outcome notification payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeUpdate {
    /// Idempotency key of the processed intent
    pub id: String,
    /// Per-account topic the update belongs to (the source account)
    pub account_topic: AccountId,
    pub status: NotifyStatus,
    pub amount: Decimal,
    /// New source balance after a successful transfer, absent otherwise
    pub new_balance: Option<Decimal>,
    pub timestamp_ms: i64,
}

impl OutcomeUpdate {
    pub fn new(
        key: impl Into<String>,
        account: AccountId,
        status: NotifyStatus,
        amount: Decimal,
        new_balance: Option<Decimal>,
    ) -> Self {
        Self {
            id: key.into(),
            account_topic: account,
            status,
            amount,
            new_balance,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Fire-and-forget outcome publisher
#[async_trait]
pub trait OutcomeNotifier: Send + Sync {
    async fn publish(&self, update: OutcomeUpdate);
}

/// Broadcast-channel notifier
///
/// Fan-out to any number of subscribers. No subscribers and lagging
/// subscribers are both fine; `send` errors are logged and dropped.
pub struct BroadcastNotifier {
    tx: broadcast::Sender<OutcomeUpdate>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OutcomeUpdate> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl OutcomeNotifier for BroadcastNotifier {
    async fn publish(&self, update: OutcomeUpdate) {
        match self.tx.send(update) {
            Ok(subscribers) => {
                debug!(subscribers, "Outcome published");
            }
            Err(_) => {
                // No live subscribers - best effort, nothing to do
                debug!("Outcome published with no subscribers");
            }
        }
    }
}

/// Notifier that discards everything
pub struct NoopNotifier;

#[async_trait]
impl OutcomeNotifier for NoopNotifier {
    async fn publish(&self, _update: OutcomeUpdate) {}
}
