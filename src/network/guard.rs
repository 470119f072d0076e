//! Chain identity check run before every handle is handed out.

use crate::blockchain::rpc::RpcHandle;
use crate::blockchain::types::ChainId;
use crate::error::{ClientError, ClientResult};

/// Rejects handles connected to any chain but the deployment chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkGuard {
    expected: ChainId,
}

impl NetworkGuard {
    pub fn new(expected: impl Into<ChainId>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    pub fn expected(&self) -> ChainId {
        self.expected
    }

    /// Compare a reported chain ID against the expected one.
    pub fn check(&self, actual: ChainId) -> ClientResult<()> {
        if actual != self.expected {
            return Err(ClientError::WrongNetwork {
                expected: self.expected.0,
                actual: actual.0,
            });
        }
        Ok(())
    }

    /// Ask the handle for its chain and check it. Issues no contract call.
    pub async fn validate_network(&self, rpc: &dyn RpcHandle) -> ClientResult<()> {
        let actual = rpc.chain_id().await.map_err(ClientError::read)?;
        self.check(ChainId(actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_chain() {
        let guard = NetworkGuard::new(4u64);
        assert!(guard.check(ChainId(4)).is_ok());
        assert_eq!(guard.expected(), ChainId(4));
    }

    #[test]
    fn test_mismatched_chain() {
        let guard = NetworkGuard::new(4u64);
        let err = guard.check(ChainId(1)).unwrap_err();
        assert!(matches!(
            err,
            ClientError::WrongNetwork {
                expected: 4,
                actual: 1
            }
        ));
    }
}
