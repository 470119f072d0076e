//! Contract ABI and typed views over an `RpcHandle`.
//!
//! The ABI is generated with `sol!`; the views only encode calls, decode
//! return data and record read metrics. Chain integers stay `U256`.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::rpc::{ContractCall, RpcHandle, TxReceipt};
use crate::blockchain::types::{RpcError, RpcResult};
use crate::observability::metrics;

sol! {
    /// Fungible ICO token. Holders of certificates may claim; anyone may mint.
    #[derive(Debug, PartialEq, Eq)]
    interface ICryptoDevToken {
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function owner() external view returns (address);
        function tokenIdsClaimed(uint256 tokenId) external view returns (bool);
        function mint(uint256 amount) external payable;
        function claim() external;
        function withdraw() external;
    }

    /// Enumerable certificate collection.
    #[derive(Debug, PartialEq, Eq)]
    interface ICryptoDevsNft {
        function balanceOf(address account) external view returns (uint256);
        function tokenOfOwnerByIndex(address account, uint256 index) external view returns (uint256);
    }
}

async fn read<C: SolCall>(rpc: &dyn RpcHandle, to: Address, call: C) -> RpcResult<C::Return> {
    let result = rpc.call(ContractCall::new(to, call.abi_encode())).await;
    let decoded = result.and_then(|output| {
        C::abi_decode_returns(&output)
            .map_err(|e| RpcError::Decode(format!("{}: {}", C::SIGNATURE, e)))
    });
    metrics::record_rpc_read(C::SIGNATURE, decoded.is_ok());
    decoded
}

/// View over the token contract.
#[derive(Clone, Copy)]
pub struct TokenContract<'a> {
    rpc: &'a dyn RpcHandle,
    address: Address,
}

impl<'a> TokenContract<'a> {
    pub fn new(rpc: &'a dyn RpcHandle, address: Address) -> Self {
        Self { rpc, address }
    }

    pub async fn balance_of(&self, account: Address) -> RpcResult<U256> {
        read(self.rpc, self.address, ICryptoDevToken::balanceOfCall { account }).await
    }

    pub async fn total_supply(&self) -> RpcResult<U256> {
        read(self.rpc, self.address, ICryptoDevToken::totalSupplyCall {}).await
    }

    pub async fn owner(&self) -> RpcResult<Address> {
        read(self.rpc, self.address, ICryptoDevToken::ownerCall {}).await
    }

    pub async fn token_ids_claimed(&self, token_id: U256) -> RpcResult<bool> {
        read(
            self.rpc,
            self.address,
            ICryptoDevToken::tokenIdsClaimedCall { tokenId: token_id },
        )
        .await
    }

    /// Submit `mint(amount)` carrying `value` wei.
    pub async fn mint(&self, amount: U256, value: U256) -> RpcResult<TxReceipt> {
        let input = ICryptoDevToken::mintCall { amount }.abi_encode();
        self.rpc
            .submit(ContractCall::new(self.address, input).with_value(value))
            .await
    }

    pub async fn claim(&self) -> RpcResult<TxReceipt> {
        let input = ICryptoDevToken::claimCall {}.abi_encode();
        self.rpc.submit(ContractCall::new(self.address, input)).await
    }

    pub async fn withdraw(&self) -> RpcResult<TxReceipt> {
        let input = ICryptoDevToken::withdrawCall {}.abi_encode();
        self.rpc.submit(ContractCall::new(self.address, input)).await
    }
}

/// View over the certificate contract.
#[derive(Clone, Copy)]
pub struct CertificateContract<'a> {
    rpc: &'a dyn RpcHandle,
    address: Address,
}

impl<'a> CertificateContract<'a> {
    pub fn new(rpc: &'a dyn RpcHandle, address: Address) -> Self {
        Self { rpc, address }
    }

    /// Number of certificates held by `account`.
    pub async fn balance_of(&self, account: Address) -> RpcResult<U256> {
        read(self.rpc, self.address, ICryptoDevsNft::balanceOfCall { account }).await
    }

    pub async fn token_of_owner_by_index(&self, account: Address, index: U256) -> RpcResult<U256> {
        read(
            self.rpc,
            self.address,
            ICryptoDevsNft::tokenOfOwnerByIndexCall { account, index },
        )
        .await
    }
}
