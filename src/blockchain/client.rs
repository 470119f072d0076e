//! Alloy-backed RPC handle.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint, with a wallet filler when signing
//! - Bound every read with the configured timeout
//! - Submit transactions and await their receipt with no deadline

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
use tokio::time::timeout;

use crate::blockchain::rpc::{ContractCall, RpcHandle, TxReceipt};
use crate::blockchain::types::{RpcError, RpcResult};
use crate::blockchain::wallet::Wallet;
use crate::config::NetworkConfig;

/// RPC handle over an alloy HTTP provider.
#[derive(Clone)]
pub struct AlloyRpc {
    provider: Arc<dyn Provider + Send + Sync>,
    /// Signing account, if a wallet is attached.
    account: Option<Address>,
    rpc_url: String,
    timeout_secs: u64,
}

impl AlloyRpc {
    /// Read-only handle.
    pub fn read_only(config: &NetworkConfig) -> RpcResult<Self> {
        let url = parse_url(&config.rpc_url)?;
        let provider = ProviderBuilder::new().connect_http(url);
        Ok(Self::from_parts(Arc::new(provider), None, config))
    }

    /// Handle that signs as `wallet`.
    pub fn with_wallet(config: &NetworkConfig, wallet: &Wallet) -> RpcResult<Self> {
        let url = parse_url(&config.rpc_url)?;
        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url);
        Ok(Self::from_parts(
            Arc::new(provider),
            Some(wallet.address()),
            config,
        ))
    }

    fn from_parts(
        provider: Arc<dyn Provider + Send + Sync>,
        account: Option<Address>,
        config: &NetworkConfig,
    ) -> Self {
        Self {
            provider,
            account,
            rpc_url: config.rpc_url.clone(),
            timeout_secs: config.rpc_timeout_secs,
        }
    }

    fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_url(raw: &str) -> RpcResult<url::Url> {
    raw.parse()
        .map_err(|e| RpcError::Transport(format!("Invalid RPC URL '{}': {}", raw, e)))
}

#[async_trait]
impl RpcHandle for AlloyRpc {
    async fn chain_id(&self) -> RpcResult<u64> {
        match timeout(self.timeout_duration(), self.provider.get_chain_id()).await {
            Ok(Ok(id)) => Ok(id),
            Ok(Err(e)) => Err(RpcError::Transport(e.to_string())),
            Err(_) => Err(RpcError::Timeout(self.timeout_secs)),
        }
    }

    fn account(&self) -> Option<Address> {
        self.account
    }

    async fn call(&self, call: ContractCall) -> RpcResult<Bytes> {
        let tx = call.into_request(self.account);
        match timeout(self.timeout_duration(), self.provider.call(tx)).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(RpcError::Transport(e.to_string())),
            Err(_) => Err(RpcError::Timeout(self.timeout_secs)),
        }
    }

    async fn submit(&self, call: ContractCall) -> RpcResult<TxReceipt> {
        let account = self
            .account
            .ok_or_else(|| RpcError::Wallet("handle has no signing account".to_string()))?;
        let tx = call.into_request(Some(account));

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| RpcError::Rejected(e.to_string()))?;
        let tx_hash = *pending.tx_hash();
        tracing::debug!(tx_hash = %tx_hash, "Transaction broadcast, awaiting receipt");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        Ok(TxReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
        })
    }
}

impl std::fmt::Debug for AlloyRpc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloyRpc")
            .field("rpc_url", &self.rpc_url)
            .field("account", &self.account)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
