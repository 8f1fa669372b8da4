//! Risk Screen seam
//!
//! Capability interface for the risk-scoring collaborator. The scoring
//! algorithm itself lives outside this core; the consumer only needs a
//! verdict per (amount, source account) and treats an unreachable
//! screen as SAFE (fail-open, decided at the call site).

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;
use tracing::info;

use crate::ledger::AccountId;

/// Risk verdict for one transfer intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Fraud,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Safe => "SAFE",
            Verdict::Fraud => "FRAUD",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone)]
pub enum RiskError {
    #[error("Risk screen unavailable: {0}")]
    Unavailable(String),
}

/// Risk-scoring collaborator
///
/// Called once per non-duplicate intent, before any balance mutation.
/// Implementations are interchangeable: rule-based, model-backed, or an
/// always-safe stub for tests.
#[async_trait]
pub trait RiskScreen: Send + Sync {
    async fn assess(&self, amount: Decimal, source: AccountId) -> Result<Verdict, RiskError>;
}

/// Rule-based screen: any amount above the configured limit is FRAUD
pub struct ThresholdScreen {
    limit: Decimal,
}

impl ThresholdScreen {
    pub fn new(limit: Decimal) -> Self {
        Self { limit }
    }
}

#[async_trait]
impl RiskScreen for ThresholdScreen {
    async fn assess(&self, amount: Decimal, source: AccountId) -> Result<Verdict, RiskError> {
        let verdict = if amount > self.limit {
            Verdict::Fraud
        } else {
            Verdict::Safe
        };
        info!(source = %source, %amount, limit = %self.limit, verdict = %verdict, "Risk screen verdict");
        Ok(verdict)
    }
}

/// Stub that passes everything; useful for tests and environments
/// without a screening requirement
pub struct AlwaysSafe;

#[async_trait]
impl RiskScreen for AlwaysSafe {
    async fn assess(&self, _amount: Decimal, _source: AccountId) -> Result<Verdict, RiskError> {
        Ok(Verdict::Safe)
    }
}

/// Test double that always errors, for exercising the fail-open policy
#[cfg(test)]
pub struct UnavailableScreen;

#[cfg(test)]
#[async_trait]
impl RiskScreen for UnavailableScreen {
    async fn assess(&self, _amount: Decimal, _source: AccountId) -> Result<Verdict, RiskError> {
        Err(RiskError::Unavailable("screen offline".into()))
    }
}
