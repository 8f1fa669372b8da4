//! Intent Consumer
//!
//! Drives one transfer intent through the gate, the risk screen and the
//! executor, then durably records the outcome and publishes it. This is
//! the only place that owns retry policy; the executor stays
//! single-attempt.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::idempotency::{IdempotencyRecord, IdempotencyStore, OutcomeStatus, ReserveOutcome};
use crate::ledger::{LedgerError, TransferApplied, TransferExecutor};
use crate::notify::{NotifyStatus, OutcomeNotifier, OutcomeUpdate};
use crate::risk::{RiskScreen, Verdict};

use super::error::ConsumerError;
use super::state::IntentState;
use super::types::TransferIntent;

/// Consumer tuning knobs
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Bounded retries for optimistic version conflicts
    pub max_conflict_retries: u32,
    /// First backoff delay; doubles per retry
    pub backoff_base: Duration,
    /// Risk screen call budget; expiry fails open
    pub risk_timeout: Duration,
    /// Age at which a dead worker's PENDING reservation may be reclaimed
    pub reservation_stale_after: Duration,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: 3,
            backoff_base: Duration::from_millis(50),
            risk_timeout: Duration::from_secs(2),
            reservation_stale_after: Duration::from_secs(60),
        }
    }
}

pub struct IntentConsumer {
    executor: TransferExecutor,
    idempotency: Arc<dyn IdempotencyStore>,
    risk: Arc<dyn RiskScreen>,
    notifier: Arc<dyn OutcomeNotifier>,
    config: ConsumerConfig,
}

impl IntentConsumer {
    pub fn new(
        executor: TransferExecutor,
        idempotency: Arc<dyn IdempotencyStore>,
        risk: Arc<dyn RiskScreen>,
        notifier: Arc<dyn OutcomeNotifier>,
        config: ConsumerConfig,
    ) -> Self {
        Self {
            executor,
            idempotency,
            risk,
            notifier,
            config,
        }
    }

    /// Process one intent to resolution
    ///
    /// Returns the resolution branch the intent took (`Duplicate`,
    /// `Blocked`, `Succeeded`, `InsufficientFunds` or `Failed`), each of
    /// which implies a recorded outcome. Only store-level failure
    /// escapes as an error, leaving the reservation pending for the
    /// transport's redelivery to pick up.
    pub async fn process(&self, intent: &TransferIntent) -> Result<IntentState, ConsumerError> {
        debug!(key = %intent.key, state = %IntentState::Received, "Processing intent");

        // === Idempotency gate ===
        match self
            .idempotency
            .reserve(&intent.key, self.config.reservation_stale_after)
            .await?
        {
            ReserveOutcome::Resolved(record) => {
                warn!(
                    key = %intent.key,
                    status = %record.status,
                    "Duplicate intent - replaying recorded outcome"
                );
                self.notifier
                    .publish(OutcomeUpdate::new(
                        &record.key,
                        record.from_id,
                        notify_status(record.status),
                        record.amount,
                        None,
                    ))
                    .await;
                return Ok(IntentState::Duplicate);
            }
            ReserveOutcome::InFlight => {
                warn!(key = %intent.key, "Intent already in flight - dropping redelivery");
                return Ok(IntentState::Duplicate);
            }
            ReserveOutcome::Reserved => {
                debug!(key = %intent.key, state = %IntentState::Gated, "Reservation won");
            }
        }

        // === Risk screen (fail-open) ===
        // If the screen errors or times out the transfer proceeds as
        // SAFE. Deliberate availability-over-blocking tradeoff: a dead
        // screen must not freeze all transfers.
        debug!(key = %intent.key, state = %IntentState::Screening, "Screening intent");
        let verdict = match timeout(
            self.config.risk_timeout,
            self.risk.assess(intent.amount, intent.from_id),
        )
        .await
        {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(e)) => {
                warn!(key = %intent.key, error = %e, "Risk screen unavailable - failing open to SAFE");
                Verdict::Safe
            }
            Err(_) => {
                warn!(key = %intent.key, "Risk screen timed out - failing open to SAFE");
                Verdict::Safe
            }
        };

        if verdict == Verdict::Fraud {
            error!(key = %intent.key, amount = %intent.amount, "Risk screen blocked transfer");
            let record = self.build_record(
                intent,
                OutcomeStatus::BlockedByRisk,
                403,
                serde_json::json!({ "status": "BLOCKED_BY_RISK" }).to_string(),
            );
            self.record_and_notify(intent, record, NotifyStatus::Fraud, None)
                .await?;
            return Ok(IntentState::Blocked);
        }

        // === Execute with bounded conflict retry ===
        debug!(key = %intent.key, state = %IntentState::Executing, "Executing transfer");
        let result = self.execute_with_retry(intent).await;

        match result {
            Ok(applied) => {
                if applied.replayed {
                    // Committed by a previous attempt that died before
                    // recording; the reclaimed reservation resolves now.
                    info!(key = %intent.key, "Transfer was already committed - recording outcome");
                }
                let record = self.build_record(
                    intent,
                    OutcomeStatus::Success,
                    200,
                    serde_json::json!({
                        "status": "SUCCESS",
                        "transactionId": applied.transaction_id.to_string(),
                        "newBalance": applied.source_balance,
                    })
                    .to_string(),
                );
                self.record_and_notify(
                    intent,
                    record,
                    NotifyStatus::Success,
                    Some(applied.source_balance),
                )
                .await?;
                info!(
                    key = %intent.key,
                    new_balance = %applied.source_balance,
                    "Transfer succeeded"
                );
                Ok(IntentState::Succeeded)
            }
            Err(LedgerError::InsufficientFunds) => {
                info!(key = %intent.key, amount = %intent.amount, "Transfer rejected: insufficient funds");
                let record = self.build_record(
                    intent,
                    OutcomeStatus::InsufficientFunds,
                    422,
                    serde_json::json!({ "status": "INSUFFICIENT_FUNDS" }).to_string(),
                );
                self.record_and_notify(intent, record, NotifyStatus::InsufficientFunds, None)
                    .await?;
                Ok(IntentState::InsufficientFunds)
            }
            Err(
                e @ (LedgerError::AccountNotFound(_)
                | LedgerError::InvalidAmount
                | LedgerError::SameAccount),
            ) => {
                warn!(key = %intent.key, error = %e, "Transfer rejected");
                let record = self.build_record(
                    intent,
                    OutcomeStatus::Error,
                    e.http_status(),
                    serde_json::json!({ "status": "ERROR", "error": e.code() }).to_string(),
                );
                self.record_and_notify(intent, record, NotifyStatus::Error, None)
                    .await?;
                Ok(IntentState::Failed)
            }
            Err(e @ LedgerError::VersionConflict) => {
                // Bounded retries exhausted
                error!(key = %intent.key, "Version conflicts exhausted retry budget");
                let record = self.build_record(
                    intent,
                    OutcomeStatus::Error,
                    e.http_status(),
                    serde_json::json!({ "status": "ERROR", "error": e.code() }).to_string(),
                );
                self.record_and_notify(intent, record, NotifyStatus::Error, None)
                    .await?;
                Ok(IntentState::Failed)
            }
            Err(e) => {
                // Store-level failure: no blind retry of money movement.
                // The reservation stays pending; redelivery resumes the
                // intent and the reference-guarded commit keeps it safe.
                error!(key = %intent.key, error = %e, "Ledger store failure - leaving intent for redelivery");
                Err(e.into())
            }
        }
    }

    async fn execute_with_retry(
        &self,
        intent: &TransferIntent,
    ) -> Result<TransferApplied, LedgerError> {
        let mut attempt: u32 = 0;
        loop {
            match self
                .executor
                .execute(intent.from_id, intent.to_id, intent.amount, &intent.key)
                .await
            {
                Err(LedgerError::VersionConflict)
                    if attempt < self.config.max_conflict_retries =>
                {
                    attempt += 1;
                    // Exponent capped so an oversized retry budget cannot
                    // overflow the multiplier
                    let backoff = self
                        .config
                        .backoff_base
                        .saturating_mul(1u32 << (attempt - 1).min(10));
                    debug!(
                        key = %intent.key,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        "Version conflict - retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                other => return other,
            }
        }
    }

    fn build_record(
        &self,
        intent: &TransferIntent,
        status: OutcomeStatus,
        status_code: u16,
        response_body: String,
    ) -> IdempotencyRecord {
        IdempotencyRecord::new(
            &intent.key,
            status,
            status_code,
            intent.from_id,
            intent.to_id,
            intent.amount,
            response_body,
        )
    }

    /// Durably record the outcome, then publish it
    ///
    /// The finalize is CAS-guarded by the key, so racing resolvers
    /// cannot clobber each other; the loser skips its notification.
    async fn record_and_notify(
        &self,
        intent: &TransferIntent,
        record: IdempotencyRecord,
        status: NotifyStatus,
        new_balance: Option<rust_decimal::Decimal>,
    ) -> Result<(), ConsumerError> {
        let resolved = self.idempotency.finalize(&intent.key, record).await?;
        if !resolved {
            warn!(key = %intent.key, "Outcome already recorded by another worker - skipping notify");
            return Ok(());
        }

        debug!(key = %intent.key, state = %IntentState::Recorded, "Outcome recorded");
        self.notifier
            .publish(OutcomeUpdate::new(
                &intent.key,
                intent.from_id,
                status,
                intent.amount,
                new_balance,
            ))
            .await;
        Ok(())
    }
}

fn notify_status(status: OutcomeStatus) -> NotifyStatus {
    match status {
        OutcomeStatus::Success => NotifyStatus::Success,
        OutcomeStatus::InsufficientFunds => NotifyStatus::InsufficientFunds,
        OutcomeStatus::BlockedByRisk => NotifyStatus::Fraud,
        OutcomeStatus::Error => NotifyStatus::Error,
    }
}
