//! The RPC handle boundary.
//!
//! Everything above this trait is chain-agnostic: the resolver, the
//! eligibility engine and the orchestrator only ever see a
//! `dyn RpcHandle`. `AlloyRpc` is the production implementation.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::blockchain::types::RpcResult;

/// A contract call, either read-only or to be submitted as a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// Contract address.
    pub to: Address,
    /// ABI-encoded calldata.
    pub input: Bytes,
    /// Native value attached (zero for non-payable calls).
    pub value: U256,
}

impl ContractCall {
    /// Create a call carrying no value.
    pub fn new(to: Address, input: impl Into<Bytes>) -> Self {
        Self {
            to,
            input: input.into(),
            value: U256::ZERO,
        }
    }

    /// Attach native value.
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Convert into a transaction request, optionally bound to a sender.
    pub fn into_request(self, from: Option<Address>) -> TransactionRequest {
        let tx = TransactionRequest::default()
            .with_to(self.to)
            .with_input(self.input)
            .with_value(self.value);
        match from {
            Some(from) => tx.with_from(from),
            None => tx,
        }
    }
}

/// Terminal state of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// False when the transaction was mined but reverted.
    pub success: bool,
}

/// Handle to a connected node, optionally able to sign for one account.
#[async_trait]
pub trait RpcHandle: Send + Sync {
    /// Chain ID reported by the node.
    async fn chain_id(&self) -> RpcResult<u64>;

    /// The signing account, if this handle can sign.
    fn account(&self) -> Option<Address>;

    /// Execute a read-only call and return the raw return data.
    async fn call(&self, call: ContractCall) -> RpcResult<Bytes>;

    /// Submit a transaction and wait, without a deadline, for its receipt.
    async fn submit(&self, call: ContractCall) -> RpcResult<TxReceipt>;
}
