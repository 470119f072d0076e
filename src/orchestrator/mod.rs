//! Transaction orchestration subsystem.
//!
//! # State Machine
//! ```text
//! Idle → Submitting → Confirmed → Idle (refreshed)
//!                  └→ Failed    → Idle (stale)
//! ```
//! There is no cancellation: only a rejection or a receipt ends
//! `Submitting`.

pub mod refresh;
pub mod transaction;

use alloy::primitives::TxHash;
use serde::Serialize;

pub use refresh::{RefreshScope, StateRefresher};
pub use transaction::TransactionOrchestrator;

/// A mutating operation against the token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Mint,
    Claim,
    Withdraw,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Mint => "mint",
            Operation::Claim => "claim",
            Operation::Withdraw => "withdraw",
        }
    }

    /// What must be re-read after this operation confirms.
    pub fn refresh_scope(&self) -> RefreshScope {
        match self {
            Operation::Mint | Operation::Claim => RefreshScope::Claimable,
            Operation::Withdraw => RefreshScope::Ownership,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxOutcome {
    pub operation: Operation,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}
