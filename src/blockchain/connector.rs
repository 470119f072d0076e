//! Wallet connector: the external collaborator that produces RPC handles.

use std::sync::Arc;

use async_trait::async_trait;

use crate::blockchain::client::AlloyRpc;
use crate::blockchain::rpc::RpcHandle;
use crate::blockchain::types::RpcResult;
use crate::blockchain::wallet::Wallet;
use crate::config::NetworkConfig;

/// Something that can hand out a connected RPC handle.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    async fn connect(&self) -> RpcResult<Arc<dyn RpcHandle>>;
}

/// Connector backed by a local key and an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct LocalWalletConnector {
    network: NetworkConfig,
    wallet: Option<Wallet>,
}

impl LocalWalletConnector {
    pub fn new(network: NetworkConfig, wallet: Option<Wallet>) -> Self {
        Self { network, wallet }
    }

    /// Use the key from the environment; fall back to read-only without one.
    pub fn from_env(network: NetworkConfig) -> Self {
        let wallet = match Wallet::from_env() {
            Ok(wallet) => Some(wallet),
            Err(e) => {
                tracing::warn!(error = %e, "No signing key available, connecting read-only");
                None
            }
        };
        Self::new(network, wallet)
    }
}

#[async_trait]
impl WalletConnector for LocalWalletConnector {
    async fn connect(&self) -> RpcResult<Arc<dyn RpcHandle>> {
        let rpc = match &self.wallet {
            Some(wallet) => AlloyRpc::with_wallet(&self.network, wallet)?,
            None => AlloyRpc::read_only(&self.network)?,
        };
        tracing::debug!(rpc = ?rpc, "Wallet connector produced handle");
        Ok(Arc::new(rpc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_without_wallet_is_read_only() {
        let connector = LocalWalletConnector::new(NetworkConfig::default(), None);
        let handle = connector.connect().await.unwrap();
        assert!(handle.account().is_none());
    }

    #[tokio::test]
    async fn test_connect_with_wallet_binds_account() {
        let wallet = Wallet::from_private_key(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let address = wallet.address();
        let connector = LocalWalletConnector::new(NetworkConfig::default(), Some(wallet));
        let handle = connector.connect().await.unwrap();
        assert_eq!(handle.account(), Some(address));
    }
}
