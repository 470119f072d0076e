//! Error taxonomy for the client components.
//!
//! Every remote failure is converted into one of these at the component
//! boundary that observed it. Read failures are degraded by the caller;
//! only `WrongNetwork` and `Transaction` ever reach the user as notices.

use thiserror::Error;

use crate::blockchain::types::RpcError;

/// Errors surfaced by the resolver, eligibility engine and orchestrator.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Wallet connector has not completed a connection, or has no signing account.
    #[error("wallet not connected: {0}")]
    Connection(String),

    /// Connected chain does not match the deployment chain.
    #[error("wrong network: expected chain {expected}, connected to {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// A contract read failed.
    #[error("remote read failed: {0}")]
    RemoteRead(String),

    /// Submission or mining of a transaction failed.
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// Operation refused before any remote call was issued.
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionError),
}

/// Reasons a mutating operation is refused up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("mint amount must be greater than zero")]
    ZeroAmount,

    #[error("mint amount is too large to pay for")]
    AmountTooLarge,

    #[error("another transaction is already in flight")]
    AlreadyInFlight,

    #[error("connected account is not the contract owner")]
    NotOwner,
}

impl ClientError {
    /// Wrap an RPC failure that happened during a read.
    pub fn read(err: RpcError) -> Self {
        ClientError::RemoteRead(err.to_string())
    }

    /// Wrap an RPC failure that happened during submission or confirmation.
    pub fn transaction(err: RpcError) -> Self {
        ClientError::Transaction(err.to_string())
    }

    /// True when the error is a refusal that issued no remote call.
    pub fn is_precondition(&self) -> bool {
        matches!(self, ClientError::Precondition(_))
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::WrongNetwork { expected: 4, actual: 1 };
        assert_eq!(
            err.to_string(),
            "wrong network: expected chain 4, connected to 1"
        );

        let err: ClientError = PreconditionError::NotOwner.into();
        assert!(err.is_precondition());
        assert!(err.to_string().contains("not the contract owner"));
    }

    #[test]
    fn test_rpc_error_wrapping() {
        let err = ClientError::read(RpcError::Transport("connection refused".into()));
        assert!(matches!(err, ClientError::RemoteRead(_)));
        assert!(err.to_string().contains("connection refused"));

        let err = ClientError::transaction(RpcError::Rejected("user denied".into()));
        assert!(matches!(err, ClientError::Transaction(_)));
        assert!(!err.is_precondition());
    }
}
