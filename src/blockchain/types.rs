//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur at the RPC boundary.
#[derive(Debug, Error)]
pub enum RpcError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Transport(String),

    /// RPC read timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was refused before inclusion (by the signer or the node).
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Transaction was mined but reverted.
    #[error("Transaction reverted: {0}")]
    Reverted(TxHash),

    /// Contract returned data that does not match the ABI.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Handle cannot sign.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(4u64);
        assert_eq!(chain_id.0, 4);
        assert_eq!(u64::from(chain_id), 4);
        assert_eq!(chain_id.to_string(), "4");
    }

    #[test]
    fn test_error_display() {
        let err = RpcError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = RpcError::Reverted(TxHash::ZERO);
        assert!(err.to_string().starts_with("Transaction reverted: 0x0000"));
    }
}
