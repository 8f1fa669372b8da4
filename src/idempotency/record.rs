//! Idempotency record types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::AccountId;

/// Final status of one processed transfer intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    Success,
    InsufficientFunds,
    BlockedByRisk,
    Error,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "SUCCESS",
            OutcomeStatus::InsufficientFunds => "INSUFFICIENT_FUNDS",
            OutcomeStatus::BlockedByRisk => "BLOCKED_BY_RISK",
            OutcomeStatus::Error => "ERROR",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "SUCCESS" => Some(OutcomeStatus::Success),
            "INSUFFICIENT_FUNDS" => Some(OutcomeStatus::InsufficientFunds),
            "BLOCKED_BY_RISK" => Some(OutcomeStatus::BlockedByRisk),
            "ERROR" => Some(OutcomeStatus::Error),
            _ => None,
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Durable outcome of one idempotency key
///
/// Created once on first resolution of the key, never mutated, and read
/// on every redelivery to short-circuit reprocessing. Parties and amount
/// are kept for audit/history queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyRecord {
    pub key: String,
    pub status: OutcomeStatus,
    /// HTTP-style result code (200, 403, 422, ...)
    pub status_code: u16,
    pub from_id: AccountId,
    pub to_id: AccountId,
    pub amount: Decimal,
    /// Opaque result payload (JSON in practice)
    pub response_body: String,
    pub resolved_at: DateTime<Utc>,
}

impl IdempotencyRecord {
    pub fn new(
        key: impl Into<String>,
        status: OutcomeStatus,
        status_code: u16,
        from_id: AccountId,
        to_id: AccountId,
        amount: Decimal,
        response_body: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            status,
            status_code,
            from_id,
            to_id,
            amount,
            response_body: response_body.into(),
            resolved_at: Utc::now(),
        }
    }
}
