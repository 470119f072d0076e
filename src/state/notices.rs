//! User-visible notices.
//!
//! Only network mismatches and terminal transaction outcomes are
//! surfaced; read failures degrade silently and never produce a notice.

use alloy::primitives::TxHash;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::orchestrator::Operation;

/// A message the presentation layer should show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The wallet is on the wrong chain; the operation was aborted.
    WrongNetwork { expected: u64, actual: u64 },
    /// A transaction was confirmed.
    TransactionConfirmed { operation: Operation, tx_hash: TxHash },
    /// A transaction was rejected or reverted.
    TransactionFailed { operation: Operation, reason: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::WrongNetwork { expected, .. } => {
                write!(f, "Change the network to chain {}", expected)
            }
            Notice::TransactionConfirmed { operation, .. } => {
                write!(f, "Successfully completed {}", operation)
            }
            Notice::TransactionFailed { operation, reason } => {
                write!(f, "{} failed: {}", operation, reason)
            }
        }
    }
}

/// Broadcast fan-out for notices.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    /// Publish a notice. Having no subscribers is not an error.
    pub fn publish(&self, notice: Notice) {
        tracing::debug!(notice = %notice, "Publishing notice");
        let _ = self.tx.send(notice);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(16)
    }
}
