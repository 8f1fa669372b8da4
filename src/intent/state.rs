//! Intent processing state machine
//!
//! ```text
//! RECEIVED → GATED → {DUPLICATE, SCREENING}
//!                      SCREENING → {BLOCKED, EXECUTING}
//!                      EXECUTING → {SUCCEEDED, INSUFFICIENT_FUNDS, FAILED}
//! any terminal branch → RECORDED
//! ```

use std::fmt;

/// Per-intent processing states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentState {
    /// Intent pulled from the queue
    Received,
    /// Idempotency gate consulted
    Gated,
    /// Key already resolved - terminal dedup path, no financial effect
    Duplicate,
    /// Risk screen call in progress
    Screening,
    /// Risk screen returned FRAUD - no money moves
    Blocked,
    /// Transfer executor running
    Executing,
    Succeeded,
    InsufficientFunds,
    /// Non-business failure (conflict retries exhausted, bad intent)
    Failed,
    /// Outcome durably written - the only terminal state
    Recorded,
}

impl IntentState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, IntentState::Recorded)
    }

    /// States that resolve an intent and lead straight to `Recorded`
    #[inline]
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            IntentState::Duplicate
                | IntentState::Blocked
                | IntentState::Succeeded
                | IntentState::InsufficientFunds
                | IntentState::Failed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentState::Received => "RECEIVED",
            IntentState::Gated => "GATED",
            IntentState::Duplicate => "DUPLICATE",
            IntentState::Screening => "SCREENING",
            IntentState::Blocked => "BLOCKED",
            IntentState::Executing => "EXECUTING",
            IntentState::Succeeded => "SUCCEEDED",
            IntentState::InsufficientFunds => "INSUFFICIENT_FUNDS",
            IntentState::Failed => "FAILED",
            IntentState::Recorded => "RECORDED",
        }
    }
}

impl fmt::Display for IntentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
